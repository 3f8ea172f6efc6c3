//! Core traits, types, and card routing logic for boardhand.
//!
//! This crate decides, for a repository event and the current state of a
//! project board, which column a card belongs in and whether it should be
//! created, moved, or archived. Board access goes through the [`BoardClient`]
//! trait so the logic can run against any backend.

pub mod board;
pub mod config;
pub mod error;
pub mod event;
pub mod handlers;
pub mod locator;
pub mod resolver;
pub mod router;
pub mod types;

pub use board::BoardClient;
pub use config::{LabelPrecedence, Settings};
pub use error::{Error, Result};
pub use event::{ContentItem, Event, Trigger};
pub use router::{resolve_project, Router};
pub use types::*;
