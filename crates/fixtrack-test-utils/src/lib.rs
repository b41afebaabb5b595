// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Fixtrack integration tests.
//!
//! Provides an in-memory store with the same optimistic-versioning
//! semantics as the SQLite backend, plus session/user fixtures, for fast,
//! deterministic, CI-runnable tests without a database file.

pub mod fixtures;
pub mod memory_store;

pub use fixtures::{new_user, session_for};
pub use memory_store::MemoryStore;
