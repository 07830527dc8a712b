pub mod client;
pub mod error;
pub mod poll;

pub use client::MenuApiClient;
pub use error::{ClientError, Result};
pub use poll::{ProgressSource, format_progress, wait_until_ready};
