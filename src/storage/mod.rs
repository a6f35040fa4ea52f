//! Storage layer for screentime.
//!
//! This module provides SQLite-based persistence for closed usage sessions.

mod database;
mod migrations;

pub use database::Database;
