pub mod dice;
pub mod game;
pub mod player;
pub mod roles;
pub mod roster;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use crate::dice::{Dice, SeededDice};
    use crate::player::{Player, PlayerColor};
    use crate::roles::assign_roles;
    use crate::roster::{Roster, RosterBuilder};

    /// Build a valid roster of `n` players named Player1..PlayerN with
    /// palette colors claimed in order.
    pub fn make_roster(n: usize) -> Roster {
        let mut builder = RosterBuilder::new();
        for i in 0..n {
            builder
                .add_player(format!("Player{}", i + 1), PlayerColor::PALETTE[i])
                .expect("test roster entry");
        }
        builder.build().expect("test roster")
    }

    /// A roster of `n` players with roles already dealt (fixed seed).
    pub fn assigned_players(n: usize) -> Vec<Player> {
        let mut dice = SeededDice::seeded(42);
        assign_roles(&make_roster(n), &mut dice)
            .expect("test assignment")
            .players
    }

    /// Dice with pre-scripted answers, for forcing exact game paths.
    ///
    /// Queued values are consumed first; once a queue runs dry every
    /// `roll` returns 0 and every `chance` returns false, so tests only
    /// script the draws they care about.
    #[derive(Debug, Default)]
    pub struct ScriptedDice {
        pub rolls: VecDeque<usize>,
        pub chances: VecDeque<bool>,
    }

    impl ScriptedDice {
        pub fn empty() -> Self {
            Self::default()
        }

        pub fn with_rolls(rolls: impl IntoIterator<Item = usize>) -> Self {
            Self {
                rolls: rolls.into_iter().collect(),
                chances: VecDeque::new(),
            }
        }

        pub fn with_chances(chances: impl IntoIterator<Item = bool>) -> Self {
            Self {
                rolls: VecDeque::new(),
                chances: chances.into_iter().collect(),
            }
        }

        pub fn queue_roll(&mut self, roll: usize) -> &mut Self {
            self.rolls.push_back(roll);
            self
        }

        pub fn queue_chance(&mut self, value: bool) -> &mut Self {
            self.chances.push_back(value);
            self
        }
    }

    impl Dice for ScriptedDice {
        fn roll(&mut self, n: usize) -> usize {
            self.rolls.pop_front().map(|r| r % n).unwrap_or(0)
        }

        fn chance(&mut self, _p: f64) -> bool {
            self.chances.pop_front().unwrap_or(false)
        }
    }

}
