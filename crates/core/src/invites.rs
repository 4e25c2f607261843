//! Invite token rules.
//!
//! An invite is redeemable only while its token is *current* (issued at most
//! [`INVITE_EXPIRY_DAYS`] ago) and its `is_valid` flag has not been cleared by
//! a prior redemption or cancellation. The flag is mutated, never the row
//! deleted, so consumed invites remain as audit artifacts.

use chrono::Duration;
use uuid::Uuid;

use crate::types::Timestamp;

/// Number of days an invite token stays redeemable after issue.
pub const INVITE_EXPIRY_DAYS: i64 = 7;

/// Generate a fresh, globally unique invite token.
pub fn new_invite_token() -> Uuid {
    Uuid::new_v4()
}

/// Whether an invite issued at `invite_date` is still inside the expiry
/// window at `now`.
///
/// The window is inclusive: a token checked exactly [`INVITE_EXPIRY_DAYS`]
/// days after issue is still current.
pub fn token_is_current(invite_date: Timestamp, now: Timestamp) -> bool {
    now - invite_date <= Duration::days(INVITE_EXPIRY_DAYS)
}

/// Full token validity check: the invite must be unexpired *and* still
/// flagged valid. Expiry wins over the flag -- a stale token is dead even if
/// it was never redeemed or cancelled.
pub fn token_is_valid(invite_date: Timestamp, is_valid: bool, now: Timestamp) -> bool {
    token_is_current(invite_date, now) && is_valid
}
