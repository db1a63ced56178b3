//! Output destinations for formatted log lines

mod traits;
mod noop;
mod memory;
mod debug_output;
mod file;

pub use traits::{BoxedSink, Sink};
pub use noop::NoOpSink;
pub use memory::MemorySink;
pub use debug_output::DebugOutputSink;
pub use file::LogFile;
