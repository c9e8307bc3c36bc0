use clap::{Arg, ArgAction, Command};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, Level};

use sam::{output, parsing};

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("sam")
        .version(VERSION)
        .author("Andrew Cowie")
        .about("Compile Structured Authoring Markup documents to XML.")
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .required(true)
                .help("The output format to generate. Currently only \"xml\" is supported."),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Log the progress of parsing and output to standard error."),
        )
        .arg(
            Arg::new("filename")
                .required(true)
                .help("The SAM document to compile, or '-' to read from standard input."),
        )
        .get_matches();

    let level = if matches.get_flag("debug") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let format = matches
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("xml");

    let filename = matches
        .get_one::<String>("filename")
        .map(Path::new)
        .unwrap_or(Path::new("-"));

    info!("Compiling {}", filename.display());

    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    let document = match parsing::parse(&content) {
        Ok(document) => document,
        Err(error) => {
            eprintln!(
                "{}",
                problem::full_parsing_error(&error, filename, &content)
            );
            std::process::exit(1);
        }
    };

    let chunks = match output::serialize(&document, format) {
        Ok(chunks) => chunks,
        Err(error) => {
            eprintln!("{}", problem::concise_output_error(&error));
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    for chunk in chunks {
        if let Err(error) = writer.write_all(chunk.as_bytes()) {
            eprintln!("{}", problem::concise_write_error(&error));
            std::process::exit(1);
        }
    }
    if let Err(error) = writer.flush() {
        eprintln!("{}", problem::concise_write_error(&error));
        std::process::exit(1);
    }
}
