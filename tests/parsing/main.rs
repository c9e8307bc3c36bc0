mod errors;
mod samples;
mod structure;
