// SPDX-FileCopyrightText: 2026 Fixtrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session and input checks shared by the services.

use chrono::Utc;

use fixtrack_core::{FixtrackError, Session};

pub(crate) fn ensure_active(session: &Session) -> Result<(), FixtrackError> {
    if session.is_valid_at(Utc::now()) {
        Ok(())
    } else {
        Err(FixtrackError::Unauthenticated("session expired".into()))
    }
}

/// Trims `value` and rejects the empty result with a `Validation` error
/// naming the field.
pub(crate) fn non_empty(field: &str, value: &str) -> Result<String, FixtrackError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FixtrackError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
