//! Shared test utilities for convset integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The fake hub and fake source live in their own modules
//! and are imported by path.

pub mod builders;
pub mod fake_hub;
pub mod fake_source;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
