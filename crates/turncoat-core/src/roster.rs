use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerColor, PlayerId};

/// Errors while building a roster or starting role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Roster size outside the supported 3-8 range.
    InvalidPlayerCount(usize),
    /// The color was already claimed by another player.
    DuplicateColor(PlayerColor),
    /// Display names must be non-empty.
    EmptyName,
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPlayerCount(n) => write!(
                f,
                "cannot start game with {n} players (need {}-{})",
                Roster::MIN_PLAYERS,
                Roster::MAX_PLAYERS
            ),
            Self::DuplicateColor(c) => write!(f, "color {} is already taken", c.name()),
            Self::EmptyName => write!(f, "player name must not be empty"),
        }
    }
}

impl std::error::Error for RosterError {}

/// The ordered player list for one session. Built once via
/// [`RosterBuilder`], read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub const MIN_PLAYERS: usize = 3;
    pub const MAX_PLAYERS: usize = 8;

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        (0..self.players.len()).collect()
    }
}

/// Incremental roster construction as players sign in on the shared
/// screen. Colors are claimed first-come-first-served from the fixed
/// palette; duplicate display names are tolerated but logged.
#[derive(Debug, Default)]
pub struct RosterBuilder {
    players: Vec<Player>,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colors not yet claimed by an earlier player.
    pub fn available_colors(&self) -> Vec<PlayerColor> {
        PlayerColor::PALETTE
            .into_iter()
            .filter(|c| !self.players.iter().any(|p| p.color == *c))
            .collect()
    }

    /// Add a player, returning their stable id.
    pub fn add_player(
        &mut self,
        display_name: impl Into<String>,
        color: PlayerColor,
    ) -> Result<PlayerId, RosterError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.players.iter().any(|p| p.color == color) {
            return Err(RosterError::DuplicateColor(color));
        }
        if self.players.iter().any(|p| p.display_name == display_name) {
            tracing::warn!(name = %display_name, "duplicate display name on roster");
        }
        let id = self.players.len();
        self.players.push(Player::new(id, display_name, color));
        Ok(id)
    }

    /// Finalize the roster. Fails unless 3-8 players have signed in.
    pub fn build(self) -> Result<Roster, RosterError> {
        let n = self.players.len();
        if !(Roster::MIN_PLAYERS..=Roster::MAX_PLAYERS).contains(&n) {
            return Err(RosterError::InvalidPlayerCount(n));
        }
        Ok(Roster {
            players: self.players,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with(n: usize) -> RosterBuilder {
        let mut b = RosterBuilder::new();
        for i in 0..n {
            b.add_player(format!("Player{}", i + 1), PlayerColor::PALETTE[i])
                .unwrap();
        }
        b
    }

    #[test]
    fn build_assigns_sequential_ids() {
        let roster = builder_with(4).build().unwrap();
        let ids: Vec<_> = roster.players().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn duplicate_color_rejected() {
        let mut b = builder_with(2);
        let err = b.add_player("Carol", PlayerColor::PALETTE[0]).unwrap_err();
        assert_eq!(err, RosterError::DuplicateColor(PlayerColor::PALETTE[0]));
    }

    #[test]
    fn empty_name_rejected() {
        let mut b = RosterBuilder::new();
        assert_eq!(b.add_player("  ", PlayerColor::Red), Err(RosterError::EmptyName));
    }

    #[test]
    fn duplicate_name_tolerated() {
        let mut b = RosterBuilder::new();
        b.add_player("Sam", PlayerColor::Red).unwrap();
        assert!(b.add_player("Sam", PlayerColor::Blue).is_ok());
    }

    #[test]
    fn too_few_players_rejected() {
        assert_eq!(
            builder_with(2).build().unwrap_err(),
            RosterError::InvalidPlayerCount(2)
        );
    }

    #[test]
    fn all_supported_counts_build() {
        for n in 3..=8 {
            assert_eq!(builder_with(n).build().unwrap().len(), n);
        }
    }

    #[test]
    fn available_colors_shrink() {
        let b = builder_with(3);
        let avail = b.available_colors();
        assert_eq!(avail.len(), 5);
        assert!(!avail.contains(&PlayerColor::PALETTE[0]));
    }
}
