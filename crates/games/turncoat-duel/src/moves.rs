use serde::{Deserialize, Serialize};

use turncoat_core::dice::Dice;

/// A Rock-Paper-Scissors throw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn beats(self, other: Move) -> bool {
        matches!(
            (self, other),
            (Move::Rock, Move::Scissors)
                | (Move::Scissors, Move::Paper)
                | (Move::Paper, Move::Rock)
        )
    }

    /// Uniform random throw for the hidden engine side.
    pub fn draw(dice: &mut dyn Dice) -> Move {
        Move::ALL[dice.roll(3)]
    }
}

/// Who took the sub-game of one duel turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundWinner {
    /// The chosen player's throw won; the Good team scores.
    Actor,
    /// The hidden engine throw won; the Bad team scores.
    Engine,
    Tie,
}

/// Standard RPS resolution.
pub fn resolve(actor: Move, engine: Move) -> RoundWinner {
    if actor.beats(engine) {
        RoundWinner::Actor
    } else if engine.beats(actor) {
        RoundWinner::Engine
    } else {
        RoundWinner::Tie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turncoat_core::test_helpers::ScriptedDice;

    #[test]
    fn full_resolution_table() {
        use Move::*;
        use RoundWinner::*;
        let table = [
            (Rock, Rock, Tie),
            (Rock, Paper, Engine),
            (Rock, Scissors, Actor),
            (Paper, Rock, Actor),
            (Paper, Paper, Tie),
            (Paper, Scissors, Engine),
            (Scissors, Rock, Engine),
            (Scissors, Paper, Actor),
            (Scissors, Scissors, Tie),
        ];
        for (actor, engine, expected) in table {
            assert_eq!(
                resolve(actor, engine),
                expected,
                "{actor:?} vs {engine:?}"
            );
        }
    }

    #[test]
    fn exactly_one_side_beats_the_other() {
        for a in Move::ALL {
            for b in Move::ALL {
                if a == b {
                    assert!(!a.beats(b));
                } else {
                    assert_ne!(a.beats(b), b.beats(a));
                }
            }
        }
    }

    #[test]
    fn draw_maps_rolls_to_moves() {
        let mut dice = ScriptedDice::with_rolls([0, 1, 2]);
        assert_eq!(Move::draw(&mut dice), Move::Rock);
        assert_eq!(Move::draw(&mut dice), Move::Paper);
        assert_eq!(Move::draw(&mut dice), Move::Scissors);
    }
}
