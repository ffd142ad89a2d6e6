pub mod sink;

pub use sink::{CsvSink, MemorySink, SheetSink, SinkError};
