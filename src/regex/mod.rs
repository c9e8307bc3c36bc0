// Patterns are compiled once, on first use, and then shared for the life of
// the process. A pattern that fails to compile is a bug in this crate, not
// in the input, so that case panics.

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<::regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| ::regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}
