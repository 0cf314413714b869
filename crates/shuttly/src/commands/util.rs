//! Shared helpers for command handlers.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use shuttly_core::{AuthSession, Gate, gate};

use crate::error::CliError;

/// Apply the route-gating policy to a command surface.
///
/// `path` is the web route the command corresponds to; unauthenticated
/// visits to gated surfaces and non-admin visits to admin surfaces
/// turn into errors naming the remedy.
pub fn gate_command(session: &AuthSession, path: &str) -> Result<(), CliError> {
    match gate(path, session.role()) {
        Gate::Allow => Ok(()),
        Gate::RedirectHome => {
            if session.is_authenticated() {
                Err(CliError::Forbidden)
            } else {
                Err(CliError::NotLoggedIn)
            }
        }
        Gate::RedirectTo(_) => Err(CliError::AlreadyLoggedIn {
            name: session
                .user()
                .map(|u| u.name.clone())
                .unwrap_or_default(),
        }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// A steady-tick spinner shown while a collaborator call is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static template is valid"),
    );
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Parse a `YYYY-MM-DD` travel date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: "date".into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

/// Parse an RFC 3339 timestamp (admin schedule forms).
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("expected RFC 3339 (2025-06-14T08:30:00Z), got '{raw}'"),
        })
}

/// Ten digits, nothing else -- the backend's phone shape.
pub fn validate_phone(raw: &str) -> Result<(), CliError> {
    if raw.len() == 10 && raw.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "phone".into(),
            reason: "expected exactly 10 digits".into(),
        })
    }
}

/// Wrap a dialoguer failure (closed TTY, ctrl-c) as an IO error.
pub fn prompt_err(e: dialoguer::Error) -> CliError {
    CliError::Io(std::io::Error::other(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_must_be_ten_digits() {
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("98765").is_err());
        assert!(validate_phone("98765432101").is_err());
        assert!(validate_phone("98765abc10").is_err());
    }

    #[test]
    fn date_parses_iso_shape() {
        assert!(parse_date("2025-06-14").is_ok());
        assert!(parse_date("14/06/2025").is_err());
    }

    #[test]
    fn timestamp_requires_rfc3339() {
        assert!(parse_timestamp("departure", "2025-06-14T08:30:00Z").is_ok());
        assert!(parse_timestamp("departure", "2025-06-14 08:30").is_err());
    }
}
