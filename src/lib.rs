pub mod browser;
pub mod config;
pub mod context;
pub mod errors;
pub mod gmail;
pub mod llm;
pub mod pdf;
pub mod search;
pub mod server;

pub use errors::{TaskDeskError, TaskDeskResult};
