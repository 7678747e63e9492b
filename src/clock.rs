//! Wall-clock timestamps for registry records

use chrono::Utc;

/// Current UTC time as an RFC 3339 string
///
/// Used for both `created_at` and `last_seen`; records store the string
/// verbatim so a value read back compares equal to the value written.
#[must_use]
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}
