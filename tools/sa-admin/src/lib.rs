//! SA-Admin: operator tooling for signature proofs and timestamps.
//!
//! Every command returns a JSON value; `main.rs` only parses arguments and
//! prints.

pub mod commands;
