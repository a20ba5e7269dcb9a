//! # Gazette Shared
//!
//! Types shared between the API server and its clients: the request and
//! response shapes of every endpoint, and the error envelope.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, InvalidParam};
