//! RemoteTypes CLI library.
//!
//! This crate provides the `rtypes` binary: argument parsing, storage
//! location, and the `serve` and `exec` commands.

pub mod cli;
pub mod commands;
pub mod config;
