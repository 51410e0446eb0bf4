// SPDX-License-Identifier: MIT

//! Edemy API: backend for the Edemy learning-management platform.
//!
//! This crate provides the HTTP API that serves courses, educators, and
//! users, synchronizes identity-provider (Clerk) events, and processes
//! Stripe payment webhooks.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::MongoDb;
use services::CloudinaryService;

/// Shared application state.
///
/// Constructed once in `main` and handed to the HTTP layer behind an `Arc`;
/// never accessed as an ambient global.
pub struct AppState {
    pub config: Config,
    pub db: MongoDb,
    pub assets: CloudinaryService,
}
