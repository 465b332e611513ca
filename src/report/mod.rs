pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::aggregate;
pub use exec::{exec_releases, exec_report};
pub use output::{output_json, output_ndjson, output_table, write_csv};
