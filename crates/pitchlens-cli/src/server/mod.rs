//! Web shell for uploading rosters and running analyses.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
