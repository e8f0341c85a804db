use std::env;

mod logging;

fn get_catalog_path() -> String {
    match env::args().nth(1) {
        None => "movies.csv".to_string(),
        Some(path) => path,
    }
}

fn main() {
    logging::setup_logging();

    movielog::run(get_catalog_path());
}
