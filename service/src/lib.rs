//! mockd Service
//!
//! Request dispatch for one modeled service:
//! - Reads run the `$apply` pipeline, then the system query options
//! - Draft actions (`draftEdit`, `draftActivate`, `draftPrepare`,
//!   `draftDiscard`) and POST/PATCH/DELETE mutate the draft store
//! - Mutations hold the store's write lock until they are committed

mod config;
mod error;
mod request;
mod response;
mod service;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use request::{Method, Request};
pub use response::Response;
pub use service::{Service, SharedStore};
