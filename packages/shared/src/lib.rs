//! Shared utilities for the Yoriai workspace.

pub mod logger;
pub mod time;
