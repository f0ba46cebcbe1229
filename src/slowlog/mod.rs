pub mod event;
pub mod filter;
pub mod format;
pub mod parser;

pub use event::SlowQueryEvent;
pub use filter::is_noise;
pub use format::render;
pub use parser::SlowLogParser;
