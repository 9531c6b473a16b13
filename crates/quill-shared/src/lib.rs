//! # Quill Shared
//!
//! Wire types shared between the API server and Rust clients:
//! request DTOs, resource views, and the response envelope.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorBody, Pagination};
