//! Built-in demo data.

pub mod sample;

pub use sample::*;
