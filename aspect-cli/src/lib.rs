//! Command-line front end for the aspect graph diff engine
//!
//! Reads an input graph and a stored snapshot, runs a complete-update or
//! entries diff, and prints the update/delete payload as JSON.

pub mod cli;
pub mod commands;
pub mod error;
pub mod input;
