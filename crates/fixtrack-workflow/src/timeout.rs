// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-operation deadline enforcement for store calls.

use std::future::Future;
use std::time::Duration;

use fixtrack_core::FixtrackError;

/// Runs a store call under a deadline, surfacing `Timeout` on expiry.
///
/// The store either committed or it did not; no partial mutation survives
/// an expired call, so `Timeout` is always safe to retry.
pub async fn with_deadline<T>(
    deadline: Duration,
    fut: impl Future<Output = Result<T, FixtrackError>>,
) -> Result<T, FixtrackError> {
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(FixtrackError::Timeout { duration: deadline }),
    }
}
