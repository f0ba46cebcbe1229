pub mod channel;
pub mod runner;

pub use channel::{create_channel, Receiver, Sender};
pub use runner::{process_text, run_parser, run_writer, PipelineError, WriteStats};
