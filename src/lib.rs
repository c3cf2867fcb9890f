pub mod annotate;
pub mod changelog;
pub mod command;
pub mod config;
pub mod error;
pub mod git;
pub mod manifest;
pub mod pull_request;
pub mod registry;
pub mod ui;
pub mod version;
pub mod workflow;

pub use error::{ReleaseError, Result};
