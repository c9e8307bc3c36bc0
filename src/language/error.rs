use std::{fmt, path::Path};

/// Failure to obtain the source text at all, as distinct from failure to
/// parse it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError<'i> {
    pub problem: String,
    pub details: String,
    pub filename: &'i Path,
}

impl<'i> fmt::Display for LoadingError<'i> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self
            .details
            .is_empty()
        {
            write!(f, "{}", self.problem)
        } else {
            write!(f, "{}: {}", self.problem, self.details)
        }
    }
}
