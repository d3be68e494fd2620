pub mod formatter;
pub mod simple_formatter;

pub use formatter::Formatter;
pub use simple_formatter::SimpleFormatter;
