//! Step definitions for username resolution scenarios.

mod given;
mod then;
mod when;
pub mod world;
