//! CLI command implementations.

pub mod common;
pub mod diff;
pub mod hist;
pub mod info;
pub mod ipd;
pub mod sim;
