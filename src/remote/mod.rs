pub mod http;
pub mod traits;

pub use http::HttpLogService;
pub use traits::{LogFileDescriptor, LogPortion, LogService, RemoteError};
