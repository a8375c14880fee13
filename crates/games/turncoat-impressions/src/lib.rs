//! First Impressions: every player publicly accuses one other player of
//! being Bad. The tally is pure theater for the shared screen; nothing
//! here feeds into the duel outcome.

use serde::{Deserialize, Serialize};

use turncoat_core::dice::{Dice, shuffle};
use turncoat_core::game::{MiniGame, MiniGameMetadata};
use turncoat_core::player::PlayerId;
use turncoat_core::roster::Roster;

/// One cast suspicion vote. Never mutated after being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionVote {
    pub voter: PlayerId,
    pub suspect: PlayerId,
}

/// Rule violations while casting a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    /// A player cannot accuse themselves.
    SelfVote(PlayerId),
    /// One vote per voter; a second attempt is rejected, not overwritten.
    DuplicateVote(PlayerId),
    /// Voter or suspect id is not on the roster.
    UnknownPlayer(PlayerId),
}

impl std::fmt::Display for VoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfVote(id) => write!(f, "player {id} cannot vote for themselves"),
            Self::DuplicateVote(id) => write!(f, "player {id} has already voted"),
            Self::UnknownPlayer(id) => write!(f, "no player with id {id}"),
        }
    }
}

impl std::error::Error for VoteError {}

/// Aggregate view of the round for the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Votes in the order they were cast.
    pub votes: Vec<SuspicionVote>,
    /// The player with the most accusations, if any votes were cast.
    pub most_suspected: Option<MostSuspected>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostSuspected {
    pub suspect: PlayerId,
    pub count: usize,
}

/// One First Impressions round. Voting order is shuffled once at
/// construction; votes are append-only for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpressionsRound {
    player_count: usize,
    voting_order: Vec<PlayerId>,
    votes: Vec<SuspicionVote>,
}

impl ImpressionsRound {
    pub fn new(roster: &Roster, dice: &mut dyn Dice) -> Self {
        let mut voting_order = roster.player_ids();
        shuffle(&mut voting_order, dice);
        Self {
            player_count: roster.len(),
            voting_order,
            votes: Vec::new(),
        }
    }

    /// The randomized order the shared screen walks players through.
    pub fn voting_order(&self) -> &[PlayerId] {
        &self.voting_order
    }

    /// The first player in voting order who has not voted yet.
    pub fn next_voter(&self) -> Option<PlayerId> {
        self.voting_order
            .iter()
            .copied()
            .find(|id| !self.votes.iter().any(|v| v.voter == *id))
    }

    pub fn cast_vote(&mut self, voter: PlayerId, suspect: PlayerId) -> Result<(), VoteError> {
        if voter >= self.player_count {
            return Err(VoteError::UnknownPlayer(voter));
        }
        if suspect >= self.player_count {
            return Err(VoteError::UnknownPlayer(suspect));
        }
        if voter == suspect {
            return Err(VoteError::SelfVote(voter));
        }
        if self.votes.iter().any(|v| v.voter == voter) {
            return Err(VoteError::DuplicateVote(voter));
        }
        self.votes.push(SuspicionVote { voter, suspect });
        tracing::debug!(voter, suspect, "suspicion vote cast");
        Ok(())
    }

    pub fn votes(&self) -> &[SuspicionVote] {
        &self.votes
    }

    /// Current tally. The most-suspected tie-break goes to whichever
    /// suspect reached the winning count first in cast order.
    pub fn tally(&self) -> Tally {
        let mut counts = vec![0usize; self.player_count];
        let mut best: Option<MostSuspected> = None;
        for vote in &self.votes {
            counts[vote.suspect] += 1;
            let count = counts[vote.suspect];
            if best.is_none_or(|b| count > b.count) {
                best = Some(MostSuspected {
                    suspect: vote.suspect,
                    count,
                });
            }
        }
        Tally {
            votes: self.votes.clone(),
            most_suspected: best,
        }
    }
}

impl MiniGame for ImpressionsRound {
    fn metadata(&self) -> MiniGameMetadata {
        MiniGameMetadata {
            name: "First Impressions",
            min_players: Roster::MIN_PLAYERS as u8,
            max_players: Roster::MAX_PLAYERS as u8,
        }
    }

    fn is_complete(&self) -> bool {
        self.votes.len() == self.player_count
    }
}
