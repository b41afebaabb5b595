// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for Fixtrack.
//!
//! A single [`Database`] handle serializes all access through
//! tokio-rusqlite's background thread; [`SqliteStorage`] implements the
//! core store traits on top of it. The schema lives in embedded refinery
//! migrations and is applied on open.
//!
//! Optimistic versioning: every ticket row carries a `version` counter,
//! and updates commit only when the caller's version still matches. Losers
//! get `Conflict` and are expected to re-read before retrying.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
