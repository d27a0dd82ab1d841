//! Web API module for secureshare.
//!
//! This module provides the REST API for uploading files and managing
//! their expiration.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_app, create_router};
pub use server::WebServer;
