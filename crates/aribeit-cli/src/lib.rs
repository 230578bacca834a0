//! Command-line front end for AribEit

pub mod output;
