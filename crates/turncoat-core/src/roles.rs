use serde::{Deserialize, Serialize};

use crate::dice::{Dice, shuffle};
use crate::player::{Player, PlayerId};
use crate::roster::{Roster, RosterError};

/// A player's secret allegiance for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Good,
    Bad,
}

impl Role {
    /// Team is derived from role, never stored separately.
    pub fn team(self) -> Team {
        match self {
            Role::Good => Team::Good,
            Role::Bad => Team::Bad,
        }
    }
}

/// The two sides of the Deception Duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Good,
    Bad,
}

/// How many Bad roles are dealt and whether the Bad players learn each
/// other's identities, keyed by player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleDistribution {
    pub bad_count: usize,
    pub bad_know_each_other: bool,
}

impl RoleDistribution {
    /// Fixed distribution table for 3-8 players.
    pub fn for_player_count(n: usize) -> Option<Self> {
        let (bad_count, bad_know_each_other) = match n {
            3 | 4 => (1, false),
            5 => (2, false),
            6 | 7 => (2, true),
            8 => (3, false),
            _ => return None,
        };
        Some(Self {
            bad_count,
            bad_know_each_other,
        })
    }
}

/// Output of role assignment: the role-labeled players plus the order in
/// which roles are revealed on the shared screen. Player ids stay stable;
/// only the reveal sequence is shuffled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub players: Vec<Player>,
    pub reveal_order: Vec<PlayerId>,
}

impl RoleAssignment {
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn bad_players(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.role == Some(Role::Bad))
            .map(|p| p.id)
            .collect()
    }
}

/// Deal secret roles to a roster.
///
/// Everyone starts Good; `bad_count` distinct players are drawn Bad by
/// rejection sampling. At 6-7 players the two Bad players are linked as
/// mutual partners. The reveal order is an independent shuffle of the
/// full roster.
pub fn assign_roles(roster: &Roster, dice: &mut dyn Dice) -> Result<RoleAssignment, RosterError> {
    let n = roster.len();
    let dist =
        RoleDistribution::for_player_count(n).ok_or(RosterError::InvalidPlayerCount(n))?;

    let mut players = roster.players().to_vec();
    for player in &mut players {
        player.role = Some(Role::Good);
        player.partner = None;
    }

    // Draw distinct Bad indices, re-rolling on duplicates.
    let mut bad_ids: Vec<PlayerId> = Vec::with_capacity(dist.bad_count);
    while bad_ids.len() < dist.bad_count {
        let id = dice.roll(n);
        if !bad_ids.contains(&id) {
            bad_ids.push(id);
        }
    }
    for &id in &bad_ids {
        players[id].role = Some(Role::Bad);
    }

    if dist.bad_know_each_other && bad_ids.len() == 2 {
        players[bad_ids[0]].partner = Some(bad_ids[1]);
        players[bad_ids[1]].partner = Some(bad_ids[0]);
    }

    let mut reveal_order = roster.player_ids();
    shuffle(&mut reveal_order, dice);

    tracing::debug!(players = n, bad = dist.bad_count, "roles assigned");
    Ok(RoleAssignment {
        players,
        reveal_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::SeededDice;
    use crate::player::PlayerColor;
    use crate::roster::RosterBuilder;

    fn roster_of(n: usize) -> Roster {
        let mut b = RosterBuilder::new();
        for i in 0..n {
            b.add_player(format!("Player{}", i + 1), PlayerColor::PALETTE[i])
                .unwrap();
        }
        b.build().unwrap()
    }

    #[test]
    fn distribution_table_matches_rules() {
        let expected = [(3, 1), (4, 1), (5, 2), (6, 2), (7, 2), (8, 3)];
        for (n, bad) in expected {
            let dist = RoleDistribution::for_player_count(n).unwrap();
            assert_eq!(dist.bad_count, bad, "{n} players");
            assert_eq!(dist.bad_know_each_other, n == 6 || n == 7, "{n} players");
            assert!(dist.bad_count >= 1 && dist.bad_count < n);
        }
        assert!(RoleDistribution::for_player_count(2).is_none());
        assert!(RoleDistribution::for_player_count(9).is_none());
    }

    #[test]
    fn bad_count_exact_for_all_player_counts() {
        for n in 3..=8 {
            for seed in 0..20 {
                let mut dice = SeededDice::seeded(seed);
                let assignment = assign_roles(&roster_of(n), &mut dice).unwrap();
                let bad = assignment.bad_players().len();
                let expected = RoleDistribution::for_player_count(n).unwrap().bad_count;
                assert_eq!(bad, expected, "{n} players, seed {seed}");
                assert!(
                    assignment.players.iter().all(|p| p.role.is_some()),
                    "every player must have a role"
                );
            }
        }
    }

    #[test]
    fn partners_only_at_six_and_seven() {
        for n in 3..=8 {
            for seed in 0..20 {
                let mut dice = SeededDice::seeded(seed);
                let assignment = assign_roles(&roster_of(n), &mut dice).unwrap();
                let linked: Vec<_> = assignment
                    .players
                    .iter()
                    .filter(|p| p.partner.is_some())
                    .collect();
                if n == 6 || n == 7 {
                    assert_eq!(linked.len(), 2, "{n} players, seed {seed}");
                    for p in &linked {
                        let other = assignment.player(p.partner.unwrap()).unwrap();
                        assert_eq!(other.partner, Some(p.id), "partner link must be symmetric");
                        assert_eq!(p.role, Some(Role::Bad));
                        assert_eq!(other.role, Some(Role::Bad));
                    }
                } else {
                    assert!(linked.is_empty(), "{n} players, seed {seed}");
                }
            }
        }
    }

    #[test]
    fn three_players_never_get_partners() {
        for seed in 0..200 {
            let mut dice = SeededDice::seeded(seed);
            let assignment = assign_roles(&roster_of(3), &mut dice).unwrap();
            assert!(assignment.players.iter().all(|p| p.partner.is_none()));
        }
    }

    #[test]
    fn reveal_order_is_a_permutation_of_stable_ids() {
        let mut dice = SeededDice::seeded(5);
        let assignment = assign_roles(&roster_of(6), &mut dice).unwrap();
        let mut order = assignment.reveal_order.clone();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
        // ids were not renumbered
        for (i, p) in assignment.players.iter().enumerate() {
            assert_eq!(p.id, i);
        }
    }

    #[test]
    fn same_seed_reproduces_assignment() {
        let a = assign_roles(&roster_of(7), &mut SeededDice::seeded(11)).unwrap();
        let b = assign_roles(&roster_of(7), &mut SeededDice::seeded(11)).unwrap();
        assert_eq!(a.players, b.players);
        assert_eq!(a.reveal_order, b.reveal_order);
    }

    #[test]
    fn team_derives_from_role() {
        assert_eq!(Role::Good.team(), Team::Good);
        assert_eq!(Role::Bad.team(), Team::Bad);
    }
}
