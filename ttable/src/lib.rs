mod config;
mod error;
mod record;
mod stats;
mod table;

pub use config::{ConfigParam, OptionType, TableConfig, TableOption};
pub use error::TableError;
pub use record::{Entry, Record};
pub use stats::TableStats;
pub use table::TranspositionTable;
