//! Step definitions for message store behaviour scenarios.

pub mod world;

mod given;
mod then;
