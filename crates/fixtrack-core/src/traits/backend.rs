// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait for pluggable backends (storage, auth).

use async_trait::async_trait;

use crate::error::FixtrackError;
use crate::types::HealthStatus;

/// The base trait for Fixtrack backend implementations.
///
/// Every backend (persistence, authentication) implements this trait,
/// which provides identity, health check, and shutdown capabilities.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Returns the human-readable name of this backend instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this backend.
    fn version(&self) -> semver::Version;

    /// Performs a health check and returns the backend's current status.
    async fn health_check(&self) -> Result<HealthStatus, FixtrackError>;

    /// Gracefully shuts down the backend, releasing any held resources.
    async fn shutdown(&self) -> Result<(), FixtrackError>;
}
