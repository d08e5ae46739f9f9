// Services module - backend access

pub mod api_client;
pub mod query_cache;

pub use api_client::{ApiClient, ApiError};
pub use query_cache::QueryCache;
