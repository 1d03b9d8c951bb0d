//! HTTP API for the patient records service.
//!
//! Routes are nested under `/api/`. `api_router()` returns a composable
//! `Router`; `server::serve` binds it to a listener.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::serve;
pub use types::ApiContext;
