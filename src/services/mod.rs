// SPDX-License-Identifier: MIT

//! Services module - external collaborators behind typed clients.

pub mod cloudinary;

pub use cloudinary::CloudinaryService;
