//! Core domain types and utilities for the Vibe Flow site.
//!
//! This crate provides the foundational types and error handling shared by
//! the access-control crates and the web application.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ParseIdError, UserId};
