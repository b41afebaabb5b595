// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role-based authorization policy for Fixtrack.
//!
//! A single grant table maps (role, action) to allowed/denied, as the one
//! source of truth instead of scattered per-call-site checks. `ViewTicket`
//! is the only action with a per-ticket rule: clients may view only their
//! own tickets. Every denial surfaces as `Forbidden`, never a silent
//! degrade.

pub mod grants;

pub use grants::{can_perform, require, Action};
