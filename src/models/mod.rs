// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod course;
pub mod purchase;
pub mod user;

pub use course::Course;
pub use purchase::{Purchase, PurchaseStatus};
pub use user::User;
