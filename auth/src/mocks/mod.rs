//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider traits
//! for use in unit and integration tests.

pub mod email;
pub mod erp;
pub mod user;

pub use email::MockEmailProvider;
pub use erp::MockStudentVerifier;
pub use user::MockUserRepository;
