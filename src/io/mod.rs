pub mod csv;
pub mod summary;

pub use csv::{write_trace, write_trace_file};
pub use summary::RunSummary;
