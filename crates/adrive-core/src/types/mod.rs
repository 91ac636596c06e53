//! Core type definitions used across the A-Drive workspace.

pub mod id;

pub use id::*;
