mod client;
pub mod types;

pub use client::{ApiClient, FetchError};
