//! Compiler from structured authoring markup (SAM) to XML

#[macro_use]
mod regex;

pub mod language;
pub mod output;
pub mod parsing;
