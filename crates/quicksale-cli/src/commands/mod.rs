pub mod common;
pub mod completions;
pub mod config;
pub mod export;
pub mod flush;
pub mod pending;
pub mod sell;
pub mod skus;
pub mod today;
pub mod watch;
