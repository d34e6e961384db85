//! Trip domain module.
//!
//! Shared trip planning: the trip aggregate, its lock lifecycle, invite
//! codes, memberships, and the error taxonomy callers see.
//!
//! # Module Structure
//!
//! - `aggregate` - Trip aggregate and creation draft
//! - `status` - TripStatus state machine (Planning ↔ Locked)
//! - `invite_code` - InviteCode value object
//! - `member` - TripMember and TripRole
//! - `errors` - TripError

mod aggregate;
mod errors;
mod invite_code;
mod member;
mod status;

pub use aggregate::{trip_locked, Trip, TripDraft, TRIP_TEXT_MAX_LEN};
pub use errors::TripError;
pub use invite_code::{invite_code_not_found, InviteCode, INVITE_CODE_ALPHABET, INVITE_CODE_LENGTH};
pub use member::{TripMember, TripRole};
pub use status::TripStatus;
