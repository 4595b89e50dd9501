//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod images;
mod recipes;

pub use images::*;
pub use recipes::*;

use axum::Json;

/// Response type for JSON endpoints.
pub type ApiResult<T> = Result<Json<T>, crate::errors::AppError>;
