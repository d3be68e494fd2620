pub mod ts_reader;
pub mod ts_writer;

pub use ts_reader::TsReader;
pub use ts_writer::TsWriter;
