//! Filesystem and environment helpers for the plugin sandbox.

pub mod paths;

pub use paths::{expand_tilde, get_data_dir};
