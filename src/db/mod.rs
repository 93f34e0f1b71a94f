pub mod filter;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use filter::{FilterMode, ReportFilter};
pub use pool::{create_in_memory_pool, create_pool, DbPool};
