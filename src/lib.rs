pub mod cli;
pub mod config;
pub mod harvest;
pub mod marker;
pub mod pipeline;
pub mod position;
pub mod remote;
pub mod slowlog;
