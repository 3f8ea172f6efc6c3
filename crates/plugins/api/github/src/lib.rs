//! GitHub board client for boardhand.
//!
//! This crate implements [`boardhand_core::BoardClient`] on top of the
//! GitHub REST API for repository projects (columns and cards) and issue
//! labels.

mod client;
mod types;

pub use client::GitHubBoardClient;
pub use types::*;

/// Default GitHub API URL.
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
