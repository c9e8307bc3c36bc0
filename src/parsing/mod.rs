//! parser for SAM documents

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::language::{Document, LoadingError};

pub mod attributes;
pub mod embedded;
pub mod inline;
pub mod parser;
pub mod source;
pub mod tree;

pub use parser::ParsingError;

/// Read a file and return an owned String. We pass that ownership back to
/// the main function; the Document built from it by parse() is then free to
/// outlive the loading step. A filename of `-` reads standard input.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    if filename == Path::new("-") {
        let mut content = String::new();
        return match std::io::stdin().read_to_string(&mut content) {
            Ok(_) => Ok(content),
            Err(error) => {
                debug!(?error);
                Err(LoadingError {
                    problem: "Failed reading standard input".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                })
            }
        };
    }

    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into a Document, or return the error that stopped parsing.
pub fn parse(content: &str) -> Result<Document, ParsingError> {
    let result = parser::parse(content);

    match result {
        Ok(document) => {
            let count = document
                .root()
                .children()
                .len();
            debug!(
                "Found {} top-level block{}",
                count,
                if count == 1 { "" } else { "s" }
            );
            Ok(document)
        }
        Err(error) => {
            debug!("error: {}", error);
            Err(error)
        }
    }
}
