use super::messages::generate_error_message;
use owo_colors::OwoColorize;
use sam::{language::LoadingError, output::OutputError, parsing::ParsingError};
use serde::Serialize;
use std::io;
use std::path::Path;
use tinytemplate::TinyTemplate;

static TEMPLATE: &'static str = r#"
{label}: {filename}:{line} {problem}

{blank} {bar}
{number} {bar} {code}
{blank} {bar} {caret}

{details}
"#;

#[derive(Serialize)]
struct Context {
    label: String,
    filename: String,
    line: usize,
    problem: String,
    blank: String,
    number: String,
    bar: String,
    code: String,
    caret: String,
    details: String,
}

/// Format a parsing error with full details including source code context
pub fn full_parsing_error(error: &ParsingError, filename: &Path, source: &str) -> String {
    let (problem, details) = generate_error_message(error);
    let line = error.line();

    let code = source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("");
    let column = code
        .chars()
        .take_while(|c| c.is_whitespace())
        .count()
        + 1;
    let width = 3.max(
        line.to_string()
            .len(),
    );

    let context = Context {
        label: "error"
            .bright_red()
            .to_string(),
        filename: filename
            .to_string_lossy()
            .to_string(),
        line,
        problem: problem
            .bold()
            .to_string(),
        blank: " ".repeat(width),
        number: format!("{:>width$}", line)
            .bright_blue()
            .to_string(),
        bar: '|'
            .bright_blue()
            .to_string(),
        code: code.to_string(),
        caret: format!("{}{}", " ".repeat(column - 1), '^'.bright_red()),
        details,
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);

    let result = tt
        .add_template("problem", TEMPLATE)
        .and_then(|_| tt.render("problem", &context));

    match result {
        Ok(rendered) => rendered
            .trim_ascii()
            .to_string(),
        Err(_) => concise_parsing_error(error, filename),
    }
}

/// Format a parsing error with concise single-line output
pub fn concise_parsing_error(error: &ParsingError, filename: &Path) -> String {
    let (problem, _) = generate_error_message(error);

    format!(
        "{}: {}:{} {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        error.line(),
        problem.bold(),
    )
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .to_string()
            .bold()
    )
}

pub fn concise_output_error(error: &OutputError) -> String {
    format!(
        "{}: {}",
        "error".bright_red(),
        error
            .message()
            .bold()
    )
}

pub fn concise_write_error(error: &io::Error) -> String {
    format!(
        "{}: unable to write output: {}",
        "error".bright_red(),
        error
            .to_string()
            .bold()
    )
}
