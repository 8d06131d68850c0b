//! Name record store and name source parsing

pub mod record;
pub mod source;

pub use record::{NameRecord, NameRecordStore};
pub use source::{parse_csv, parse_names, parse_text, NameFormat};
