use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Invalid capacity: cannot size a table for {0} entries")]
    InvalidCapacity(usize),
    #[error("Cannot allocate a table of {slots} slots")]
    Allocation { slots: usize },
    #[error("Unknown option: {0}")]
    UnknownOption(String),
    #[error("Invalid value for option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },
}
