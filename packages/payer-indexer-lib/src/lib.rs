//! # payer-indexer-lib
//!
//! `payer-indexer-lib` is a collection of utilities used by the various `payer-indexer-*` crates.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod defaults;
pub mod manifest;
pub mod utils;
