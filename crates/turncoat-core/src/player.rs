use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Stable roster index of a player. Assigned once at roster build time and
/// used as the identity key everywhere else (votes, leader order, views).
pub type PlayerId = usize;

/// A player in a Turncoat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub color: PlayerColor,
    /// Secret role, `None` until assignment. Immutable for the session
    /// once set.
    pub role: Option<Role>,
    /// The other Bad player this one knows about. Only ever populated for
    /// 6-7 player games, and always symmetric.
    pub partner: Option<PlayerId>,
}

impl Player {
    pub fn new(id: PlayerId, display_name: impl Into<String>, color: PlayerColor) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            color,
            role: None,
            partner: None,
        }
    }
}

/// Avatar color selection. One entry per player, unique within a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Red,
    Teal,
    Yellow,
    Purple,
    Green,
    Orange,
    Blue,
    Pink,
}

impl PlayerColor {
    /// Predefined palette colors for player selection.
    pub const PALETTE: [PlayerColor; 8] = [
        PlayerColor::Red,
        PlayerColor::Teal,
        PlayerColor::Yellow,
        PlayerColor::Purple,
        PlayerColor::Green,
        PlayerColor::Orange,
        PlayerColor::Blue,
        PlayerColor::Pink,
    ];

    /// Display name for narration and the shared screen.
    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::Red => "Red",
            PlayerColor::Teal => "Teal",
            PlayerColor::Yellow => "Yellow",
            PlayerColor::Purple => "Purple",
            PlayerColor::Green => "Green",
            PlayerColor::Orange => "Orange",
            PlayerColor::Blue => "Blue",
            PlayerColor::Pink => "Pink",
        }
    }

    /// RGB value used by the renderer.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PlayerColor::Red => (255, 87, 87),
            PlayerColor::Teal => (78, 205, 196),
            PlayerColor::Yellow => (255, 195, 18),
            PlayerColor::Purple => (130, 88, 255),
            PlayerColor::Green => (46, 213, 115),
            PlayerColor::Orange => (255, 148, 77),
            PlayerColor::Blue => (83, 152, 255),
            PlayerColor::Pink => (255, 107, 175),
        }
    }
}
