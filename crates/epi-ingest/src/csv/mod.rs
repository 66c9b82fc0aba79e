//! CSV reading utilities.

mod options;
mod reader;
mod table;

pub use options::{IngestOptions, MAX_CSV_FILE_SIZE, SourceEncoding};
pub use reader::{check_file_size_with_limit, read_csv_str, read_csv_table};
pub use table::CsvTable;
