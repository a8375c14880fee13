use serde::{Deserialize, Serialize};

use turncoat_core::roles::Team;

/// Tie count at which a 50/50 coin flip awards a bonus point.
pub const TIE_COINFLIP_AT: u32 = 3;
/// Tie count at which Good unconditionally gets a bonus point.
pub const TIE_GOOD_BONUS_AT: u32 = 4;

/// Points a team needs to end the duel in its favor. Fixed for the
/// session once set from the player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinThresholds {
    pub good: u32,
    pub bad: u32,
}

impl WinThresholds {
    /// Fixed threshold table for 3-8 players.
    pub fn for_player_count(n: usize) -> Option<Self> {
        let (good, bad) = match n {
            3 => (4, 3),
            4 => (5, 3),
            5 => (5, 4),
            6 => (6, 5),
            7 => (7, 5),
            8 => (8, 6),
            _ => return None,
        };
        Some(Self { good, bad })
    }
}

/// Monotonically non-decreasing per-session counters, bumped once per
/// resolved turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub good: u32,
    pub bad: u32,
    pub ties: u32,
}

impl Score {
    /// The winning team once a threshold is reached.
    pub fn winner(&self, thresholds: WinThresholds) -> Option<Team> {
        if self.good >= thresholds.good {
            Some(Team::Good)
        } else if self.bad >= thresholds.bad {
            Some(Team::Bad)
        } else {
            None
        }
    }
}
