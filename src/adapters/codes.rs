//! Invite code generation adapters.

use rand::thread_rng;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::trip::InviteCode;
use crate::ports::InviteCodeSource;

/// Draws codes uniformly from `[A-Z0-9]` using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInviteCodes;

impl InviteCodeSource for RandomInviteCodes {
    fn next_code(&self) -> InviteCode {
        InviteCode::generate(&mut thread_rng())
    }
}

/// Replays a fixed list of codes, then falls back to random ones.
///
/// Lets tests force invite-code collisions deterministically.
#[derive(Debug, Default)]
pub struct ScriptedInviteCodes {
    queue: Mutex<VecDeque<InviteCode>>,
}

impl ScriptedInviteCodes {
    pub fn new(codes: impl IntoIterator<Item = InviteCode>) -> Self {
        Self {
            queue: Mutex::new(codes.into_iter().collect()),
        }
    }
}

impl InviteCodeSource for ScriptedInviteCodes {
    fn next_code(&self) -> InviteCode {
        let scripted = match self.queue.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        scripted.unwrap_or_else(|| RandomInviteCodes.next_code())
    }
}
