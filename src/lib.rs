use std::io::{self, prelude::*};
use std::path::Path;

pub mod catalog;
pub mod model;

pub use catalog::{Catalog, CatalogError, Diagnostic, ImportReport};
pub use model::movie::{Movie, ParseError};

/// Opens the catalog at `path` and runs the interactive command loop until
/// `quit` or end of input. All validation and persistence happens inside
/// [`Catalog`] and [`Movie`]; this loop only relays commands and prints.
pub fn run(path: String) {
    let mut catalog = Catalog::open(path);
    log::info!(
        "Loaded {} movies from {}",
        catalog.len(),
        catalog.path().display()
    );
    print_help();

    loop {
        print!("> ");
        io::stdout().flush().expect("could not flush stdout");

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // end of input
            Ok(_) => {}
            Err(e) => {
                log::error!("Failed to read user input: {}", e);
                break;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            "list" => list(&catalog),
            "add" => add(&mut catalog, rest),
            "edit" => edit(&mut catalog, rest),
            "remove" => remove(&mut catalog, rest),
            "import" => import(&mut catalog, rest),
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. Type 'help' for the list.", other),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list");
    println!("  add <title,year,director,rating,runtimeMinutes,votes,watched>");
    println!("  edit <position> <title,year,director,rating,runtimeMinutes,votes,watched>");
    println!("  remove <position>");
    println!("  import <path>");
    println!("  quit");
}

fn list(catalog: &Catalog) {
    if catalog.is_empty() {
        println!("The catalog is empty.");
        return;
    }
    for (position, movie) in catalog.all().iter().enumerate() {
        println!(
            "{:3}  {} | scariness {:.1}",
            position,
            movie.summary(),
            movie.scariness()
        );
    }
}

fn add(catalog: &mut Catalog, fields: &str) {
    match Movie::from_line(fields) {
        Ok(movie) => match catalog.add(movie) {
            Ok(()) => println!("Added. The catalog now holds {} movies.", catalog.len()),
            Err(e) => log::error!("The movie was added in memory, but saving failed: {}", e),
        },
        Err(e) => println!("Not added: {}", e),
    }
}

fn edit(catalog: &mut Catalog, args: &str) {
    let Some((position, fields)) = args.split_once(' ') else {
        println!("Usage: edit <position> <title,year,director,rating,runtimeMinutes,votes,watched>");
        return;
    };
    let position: usize = match position.parse() {
        Ok(position) => position,
        Err(_) => {
            println!("'{}' is not a position.", position);
            return;
        }
    };
    match Movie::from_line(fields) {
        Ok(movie) => match catalog.replace(position, movie) {
            Ok(()) => println!("Replaced the movie at position {}.", position),
            Err(CatalogError::OutOfRange { index, len }) => {
                println!("Nothing at position {}; the catalog holds {}.", index, len)
            }
            Err(e) => log::error!("The movie was replaced in memory, but saving failed: {}", e),
        },
        Err(e) => println!("Not replaced: {}", e),
    }
}

fn remove(catalog: &mut Catalog, args: &str) {
    let position: usize = match args.parse() {
        Ok(position) => position,
        Err(_) => {
            println!("Usage: remove <position>");
            return;
        }
    };
    match catalog.remove(position) {
        Ok(()) => println!("Removed. The catalog now holds {} movies.", catalog.len()),
        Err(CatalogError::OutOfRange { index, len }) => {
            println!("Nothing at position {}; the catalog holds {}.", index, len)
        }
        Err(e) => log::error!("The movie was removed in memory, but saving failed: {}", e),
    }
}

fn import(catalog: &mut Catalog, args: &str) {
    if args.is_empty() {
        println!("Usage: import <path>");
        return;
    }
    let report = catalog.import(Path::new(args));
    println!("Imported {} movies.", report.inserted);
    for error in &report.errors {
        println!("  {}", error);
    }
}
