//! Backend-facing services.

mod api_client;
mod status;

pub use api_client::*;
pub use status::*;
