//! The movie catalog: an in-memory list synchronized to one CSV file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv::Writer;
use thiserror::Error;

use crate::model::movie::{Movie, ParseError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no movie at position {index}, the catalog holds {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("could not write catalog file: {0}")]
    Write(#[from] csv::Error),
    #[error("could not write catalog file: {0}")]
    Io(#[from] io::Error),
}

/// One skipped line or file-level fault recorded while reading a catalog or
/// import file. Line numbers are 1-based and count raw lines, blanks included.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("could not read file: {0}")]
    Unreadable(String),
    #[error("line {line}: {reason}")]
    BadLine { line: usize, reason: ParseError },
    #[error("catalog changed in memory but could not be saved: {0}")]
    SaveFailed(String),
}

#[derive(Debug)]
pub struct ImportReport {
    pub inserted: usize,
    pub errors: Vec<Diagnostic>,
}

/// Movies in insertion order, bound to one file for the catalog's lifetime.
/// Every mutating call rewrites the whole file before returning; duplicates
/// are permitted.
#[derive(Debug)]
pub struct Catalog {
    path: PathBuf,
    movies: Vec<Movie>,
}

impl Catalog {
    /// Binds to `path` and loads whatever is there. A missing file just means
    /// an empty catalog. Skipped lines are logged; call [`Catalog::reload`]
    /// to get them back as values.
    pub fn open(path: impl Into<PathBuf>) -> Catalog {
        let mut catalog = Catalog {
            path: path.into(),
            movies: Vec::new(),
        };
        catalog.reload();
        catalog
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory list with the bound file's contents. Bad lines
    /// are skipped and returned as diagnostics, never an error: an unreadable
    /// or fully invalid file yields an empty catalog.
    pub fn reload(&mut self) -> Vec<Diagnostic> {
        self.movies.clear();
        if !self.path.exists() {
            return Vec::new(); // no file yet
        }

        let text = match read_file(&self.path) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Could not read catalog file {}: {}", self.path.display(), e);
                return vec![Diagnostic::Unreadable(e.to_string())];
            }
        };

        let movies = &mut self.movies;
        let diagnostics = decode_lines(&text, |movie| movies.push(movie));
        for diagnostic in &diagnostics {
            log::warn!("Skipping {}: {}", self.path.display(), diagnostic);
        }
        diagnostics
    }

    /// Rewrites the bound file: header first, then every movie in order. On
    /// failure the in-memory list is left as it was, now out of sync with
    /// disk until the next successful save.
    pub fn save(&self) -> Result<(), CatalogError> {
        let mut writer = Writer::from_path(&self.path)?;
        writer.write_record(Movie::csv_header())?;
        for movie in &self.movies {
            writer.write_record(movie.to_fields())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// A copy of the current list; mutating it never touches the catalog.
    pub fn all(&self) -> Vec<Movie> {
        self.movies.clone()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Appends and saves. On a save failure the movie stays in memory and the
    /// fault is returned.
    pub fn add(&mut self, movie: Movie) -> Result<(), CatalogError> {
        self.movies.push(movie);
        self.save()
    }

    /// Removes the movie at `index` and saves. Later positions shift down by
    /// one, so indexes captured before this call no longer point where they
    /// did. An out-of-range index changes nothing.
    pub fn remove(&mut self, index: usize) -> Result<(), CatalogError> {
        if index >= self.movies.len() {
            return Err(CatalogError::OutOfRange {
                index,
                len: self.movies.len(),
            });
        }
        self.movies.remove(index);
        self.save()
    }

    /// Overwrites the movie at `index` in place and saves, so a position-based
    /// edit is a single operation rather than a remove followed by an add.
    pub fn replace(&mut self, index: usize, movie: Movie) -> Result<(), CatalogError> {
        if index >= self.movies.len() {
            return Err(CatalogError::OutOfRange {
                index,
                len: self.movies.len(),
            });
        }
        self.movies[index] = movie;
        self.save()
    }

    /// Bulk-appends every line of `source` that decodes, keeping the lines
    /// that do not as diagnostics. Saves once at the end, and only when at
    /// least one movie came in. A missing source inserts nothing.
    pub fn import(&mut self, source: &Path) -> ImportReport {
        if !source.exists() {
            return ImportReport {
                inserted: 0,
                errors: vec![Diagnostic::MissingFile(source.to_path_buf())],
            };
        }

        let text = match read_file(source) {
            Ok(text) => text,
            Err(e) => {
                return ImportReport {
                    inserted: 0,
                    errors: vec![Diagnostic::Unreadable(e.to_string())],
                }
            }
        };

        let mut inserted = 0;
        let movies = &mut self.movies;
        let mut errors = decode_lines(&text, |movie| {
            movies.push(movie);
            inserted += 1;
        });

        if inserted > 0 {
            if let Err(e) = self.save() {
                log::error!("Imported {} movies but could not save: {}", inserted, e);
                errors.push(Diagnostic::SaveFailed(e.to_string()));
            }
        }

        ImportReport { inserted, errors }
    }
}

// The whole file in one read, decoded leniently: a stray non-UTF-8 byte
// should spoil one line, not the load.
fn read_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// Shared line walk for reload and import. A first line mentioning "title" is
// a header, blank lines are skipped, everything else either decodes into the
// sink or comes back as a diagnostic.
fn decode_lines(text: &str, mut sink: impl FnMut(Movie)) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (line_no, raw) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line_no == 1 && line.to_ascii_lowercase().contains("title") {
            continue;
        }
        match Movie::from_line(line) {
            Ok(movie) => sink(movie),
            Err(reason) => diagnostics.push(Diagnostic::BadLine {
                line: line_no,
                reason,
            }),
        }
    }
    diagnostics
}
