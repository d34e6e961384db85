//! Source of candidate invite codes.
//!
//! Uniqueness is not this port's job. Candidates are checked by the
//! storage unique constraint and regenerated on collision.

use crate::domain::trip::InviteCode;

pub trait InviteCodeSource: Send + Sync {
    /// Produce the next candidate code.
    fn next_code(&self) -> InviteCode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_code_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn InviteCodeSource) {}
    }
}
