// SPDX-License-Identifier: MIT

//! Middleware modules (authentication, CORS origin enforcement).

pub mod auth;
pub mod cors;

pub use auth::{attach_identity, AuthUser};
pub use cors::enforce_allowed_origins;
