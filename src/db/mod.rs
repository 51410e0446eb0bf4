// SPDX-License-Identifier: MIT

//! Database layer (MongoDB).

pub mod mongo;

pub use mongo::MongoDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const COURSES: &str = "courses";
    pub const PURCHASES: &str = "purchases";
}
