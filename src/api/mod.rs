//! HTTP API surface

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use routes::{create_router, ApiState};
pub use server::ApiServer;
