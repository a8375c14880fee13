//! The Deception Duel: a continuous turn-based Rock-Paper-Scissors
//! contest between the whole table (scoring for Good) and a hidden
//! engine throw (scoring for Bad), ending when either team reaches its
//! win threshold.
//!
//! The engine is a pure input-driven state machine. The shared-screen
//! front end renders `view()` and feeds user choices through
//! `select_actor` / `propose_advice` / `cast_intervention_vote` /
//! `submit_actor_move`; every random decision comes from the injected
//! [`Dice`].

pub mod config;
pub mod moves;
pub mod scoring;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use turncoat_core::dice::{Dice, shuffle};
use turncoat_core::game::{MiniGame, MiniGameMetadata};
use turncoat_core::player::{Player, PlayerId};
use turncoat_core::roles::Team;
use turncoat_core::roster::Roster;

use config::DuelConfig;
use moves::{Move, RoundWinner, resolve};
use scoring::{Score, TIE_COINFLIP_AT, TIE_GOOD_BONUS_AT, WinThresholds};

/// Where the state machine is within the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelPhase {
    /// The team leader is choosing an actor.
    SelectingActor,
    /// The leader is suggesting a (non-binding) move to the actor.
    AwaitingAdvice,
    /// The rest of the table is voting on the leader's choice.
    Intervention,
    /// The actor is making the final throw.
    AwaitingMove,
    /// A team reached its threshold; no further input is accepted.
    Ended,
}

/// Errors from duel transitions. `OutOfSequence` and `UnknownPlayer`
/// are caller bugs; the rest are rule violations the front end should
/// re-prompt for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuelError {
    UnsupportedPlayerCount(usize),
    OutOfSequence {
        expected: DuelPhase,
        actual: DuelPhase,
    },
    UnknownPlayer(PlayerId),
    /// Actor is the leader, the previous turn's actor while alternatives
    /// exist, or the player vetoed earlier in this same turn.
    IneligibleActor(PlayerId),
    /// Voter is the leader or the chosen actor.
    NotAnInterventionVoter(PlayerId),
    DuplicateInterventionVote(PlayerId),
    /// The duel is over.
    Ended,
}

impl std::fmt::Display for DuelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedPlayerCount(n) => write!(f, "cannot run a duel with {n} players"),
            Self::OutOfSequence { expected, actual } => {
                write!(f, "input expects phase {expected:?} but duel is in {actual:?}")
            },
            Self::UnknownPlayer(id) => write!(f, "no player with id {id}"),
            Self::IneligibleActor(id) => write!(f, "player {id} cannot act this turn"),
            Self::NotAnInterventionVoter(id) => {
                write!(f, "player {id} does not vote in this intervention")
            },
            Self::DuplicateInterventionVote(id) => {
                write!(f, "player {id} already cast an intervention vote")
            },
            Self::Ended => write!(f, "the duel has ended"),
        }
    }
}

impl std::error::Error for DuelError {}

/// An in-flight intervention vote on the leader's choice of actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct InterventionBallot {
    /// Everyone except the leader and the chosen actor.
    voters: Vec<PlayerId>,
    votes: BTreeMap<PlayerId, bool>,
}

/// Progress of an intervention vote after one ballot is cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterventionOutcome {
    Pending {
        votes_cast: usize,
        votes_expected: usize,
    },
    /// Majority backed the leader; the turn continues.
    Approved,
    /// Majority vetoed the actor; the turn restarts with the same
    /// leader, a fresh hidden throw, and the vetoed actor excluded from
    /// the immediate re-selection.
    Vetoed,
}

/// Everything the shared screen may see mid-turn. The hidden engine
/// throw is deliberately absent; it is only revealed in [`TurnOutcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelView {
    pub phase: DuelPhase,
    pub leader: PlayerId,
    pub chosen_actor: Option<PlayerId>,
    pub auto_selected: bool,
    pub advice: Option<Move>,
    pub engine_move_hidden: bool,
    pub score: Score,
    pub thresholds: WinThresholds,
    /// Voters still to cast a ballot, empty outside interventions.
    pub pending_voters: Vec<PlayerId>,
}

/// Full reveal of one resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub leader: PlayerId,
    pub actor: PlayerId,
    pub actor_move: Move,
    pub engine_move: Move,
    pub result: RoundWinner,
    /// Bonus point awarded by the tie-break rule, if it fired this turn.
    pub tie_bonus: Option<Team>,
    pub score: Score,
    pub winner: Option<Team>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DuelState {
    players: Vec<Player>,
    thresholds: WinThresholds,
    score: Score,
    /// Fixed rotation, shuffled once at initialization.
    leader_order: Vec<PlayerId>,
    leader_pointer: usize,
    /// Actor of the immediately preceding turn; barred from consecutive
    /// reuse while alternatives exist.
    last_actor: Option<PlayerId>,
    /// Actor vetoed earlier in the current turn, if any.
    blocked_actor: Option<PlayerId>,
    completed_first_turn: bool,
    phase: DuelPhase,
    engine_move: Move,
    chosen_actor: Option<PlayerId>,
    auto_selected: bool,
    advice: Option<Move>,
    intervention: Option<InterventionBallot>,
    winner: Option<Team>,
}

/// The duel state machine.
#[derive(Debug)]
pub struct DuelEngine {
    state: DuelState,
    config: DuelConfig,
}

impl DuelEngine {
    /// Start a duel for a role-labeled roster. Player ids must be the
    /// stable roster ids.
    pub fn new(
        players: Vec<Player>,
        config: DuelConfig,
        dice: &mut dyn Dice,
    ) -> Result<Self, DuelError> {
        let n = players.len();
        let thresholds =
            WinThresholds::for_player_count(n).ok_or(DuelError::UnsupportedPlayerCount(n))?;

        let mut leader_order: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
        shuffle(&mut leader_order, dice);

        let mut engine = Self {
            state: DuelState {
                players,
                thresholds,
                score: Score::default(),
                leader_order,
                leader_pointer: 0,
                last_actor: None,
                blocked_actor: None,
                completed_first_turn: false,
                phase: DuelPhase::SelectingActor,
                engine_move: Move::draw(dice),
                chosen_actor: None,
                auto_selected: false,
                advice: None,
                intervention: None,
                winner: None,
            },
            config,
        };
        tracing::debug!(
            players = n,
            leader = engine.leader(),
            "duel started"
        );
        engine.auto_select_if_forced();
        Ok(engine)
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    /// This turn's team leader.
    pub fn leader(&self) -> PlayerId {
        self.state.leader_order[self.state.leader_pointer]
    }

    /// The fixed leader rotation for the whole duel.
    pub fn leader_order(&self) -> &[PlayerId] {
        &self.state.leader_order
    }

    pub fn score(&self) -> Score {
        self.state.score
    }

    pub fn thresholds(&self) -> WinThresholds {
        self.state.thresholds
    }

    pub fn is_terminal(&self) -> bool {
        self.state.winner.is_some()
    }

    /// The winning team, once a threshold has been reached.
    pub fn outcome(&self) -> Option<Team> {
        self.state.winner
    }

    /// Players the leader may currently pick as actor: everyone except
    /// the leader, the player vetoed this turn, and the previous turn's
    /// actor — unless the previous actor is the only option left.
    pub fn eligible_actors(&self) -> Vec<PlayerId> {
        let leader = self.leader();
        let base: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .map(|p| p.id)
            .filter(|&id| id != leader && Some(id) != self.state.blocked_actor)
            .collect();
        let without_last: Vec<PlayerId> = base
            .iter()
            .copied()
            .filter(|&id| Some(id) != self.state.last_actor)
            .collect();
        if without_last.is_empty() { base } else { without_last }
    }

    pub fn view(&self) -> DuelView {
        let pending_voters = match &self.state.intervention {
            Some(ballot) => ballot
                .voters
                .iter()
                .copied()
                .filter(|v| !ballot.votes.contains_key(v))
                .collect(),
            None => Vec::new(),
        };
        DuelView {
            phase: self.state.phase,
            leader: self.leader(),
            chosen_actor: self.state.chosen_actor,
            auto_selected: self.state.auto_selected,
            advice: self.state.advice,
            engine_move_hidden: self.state.winner.is_none(),
            score: self.state.score,
            thresholds: self.state.thresholds,
            pending_voters,
        }
    }

    /// The leader picks the player who throws for the team this turn.
    pub fn select_actor(&mut self, actor: PlayerId) -> Result<DuelView, DuelError> {
        self.require_phase(DuelPhase::SelectingActor)?;
        if !self.state.players.iter().any(|p| p.id == actor) {
            return Err(DuelError::UnknownPlayer(actor));
        }
        if !self.eligible_actors().contains(&actor) {
            return Err(DuelError::IneligibleActor(actor));
        }
        self.state.chosen_actor = Some(actor);
        self.state.auto_selected = false;
        self.state.phase = DuelPhase::AwaitingAdvice;
        tracing::debug!(leader = self.leader(), actor, "actor selected");
        Ok(self.view())
    }

    /// The leader's suggested throw. Shown to the actor, never binding.
    /// May trigger an intervention vote on eligible turns.
    pub fn propose_advice(
        &mut self,
        advice: Move,
        dice: &mut dyn Dice,
    ) -> Result<DuelView, DuelError> {
        self.require_phase(DuelPhase::AwaitingAdvice)?;
        self.state.advice = Some(advice);

        let eligible = self.state.completed_first_turn
            && self.state.players.len() >= self.config.intervention_min_players;
        if eligible
            && dice.chance(self.config.intervention_chance)
            && let Some(actor) = self.state.chosen_actor
        {
            let leader = self.leader();
            let voters: Vec<PlayerId> = self
                .state
                .players
                .iter()
                .map(|p| p.id)
                .filter(|&id| id != leader && id != actor)
                .collect();
            tracing::debug!(leader, actor, voters = voters.len(), "intervention called");
            self.state.intervention = Some(InterventionBallot {
                voters,
                votes: BTreeMap::new(),
            });
            self.state.phase = DuelPhase::Intervention;
        } else {
            self.state.phase = DuelPhase::AwaitingMove;
        }
        Ok(self.view())
    }

    /// One yes/no ballot on the leader's choice of actor. When the last
    /// ballot lands, a strict majority of votes cast decides.
    pub fn cast_intervention_vote(
        &mut self,
        voter: PlayerId,
        approve: bool,
        dice: &mut dyn Dice,
    ) -> Result<InterventionOutcome, DuelError> {
        self.require_phase(DuelPhase::Intervention)?;
        if !self.state.players.iter().any(|p| p.id == voter) {
            return Err(DuelError::UnknownPlayer(voter));
        }
        let Some(ballot) = self.state.intervention.as_mut() else {
            return Err(DuelError::OutOfSequence {
                expected: DuelPhase::Intervention,
                actual: self.state.phase,
            });
        };
        if !ballot.voters.contains(&voter) {
            return Err(DuelError::NotAnInterventionVoter(voter));
        }
        if ballot.votes.contains_key(&voter) {
            return Err(DuelError::DuplicateInterventionVote(voter));
        }
        ballot.votes.insert(voter, approve);

        let votes_cast = ballot.votes.len();
        let votes_expected = ballot.voters.len();
        if votes_cast < votes_expected {
            return Ok(InterventionOutcome::Pending {
                votes_cast,
                votes_expected,
            });
        }

        let yes = ballot.votes.values().filter(|&&v| v).count();
        let approved = yes * 2 > votes_cast;
        self.state.intervention = None;
        if approved {
            self.state.phase = DuelPhase::AwaitingMove;
            tracing::debug!(yes, votes_cast, "intervention approved");
            Ok(InterventionOutcome::Approved)
        } else {
            // Restart the turn: same leader, fresh hidden throw, vetoed
            // actor barred from the immediate re-selection.
            self.state.blocked_actor = self.state.chosen_actor;
            self.state.chosen_actor = None;
            self.state.auto_selected = false;
            self.state.advice = None;
            self.state.engine_move = Move::draw(dice);
            self.state.phase = DuelPhase::SelectingActor;
            tracing::debug!(yes, votes_cast, "intervention vetoed, turn restarts");
            self.auto_select_if_forced();
            Ok(InterventionOutcome::Vetoed)
        }
    }

    /// The actor's final throw. Resolves the turn, applies tie-break
    /// bonuses, checks for a winner, and (if the duel continues) rotates
    /// the leadership and starts the next turn.
    pub fn submit_actor_move(
        &mut self,
        actor_move: Move,
        dice: &mut dyn Dice,
    ) -> Result<TurnOutcome, DuelError> {
        self.require_phase(DuelPhase::AwaitingMove)?;
        let Some(actor) = self.state.chosen_actor else {
            return Err(DuelError::OutOfSequence {
                expected: DuelPhase::AwaitingMove,
                actual: self.state.phase,
            });
        };

        let engine_move = self.state.engine_move;
        let result = resolve(actor_move, engine_move);
        let mut tie_bonus = None;
        match result {
            RoundWinner::Actor => self.state.score.good += 1,
            RoundWinner::Engine => self.state.score.bad += 1,
            RoundWinner::Tie => {
                self.state.score.ties += 1;
                if self.state.score.ties == TIE_COINFLIP_AT {
                    let team = if dice.chance(0.5) { Team::Good } else { Team::Bad };
                    match team {
                        Team::Good => self.state.score.good += 1,
                        Team::Bad => self.state.score.bad += 1,
                    }
                    tie_bonus = Some(team);
                } else if self.state.score.ties == TIE_GOOD_BONUS_AT {
                    self.state.score.good += 1;
                    tie_bonus = Some(Team::Good);
                }
            },
        }

        let winner = self.state.score.winner(self.state.thresholds);
        let outcome = TurnOutcome {
            leader: self.leader(),
            actor,
            actor_move,
            engine_move,
            result,
            tie_bonus,
            score: self.state.score,
            winner,
        };

        if let Some(team) = winner {
            self.state.winner = Some(team);
            self.state.phase = DuelPhase::Ended;
            tracing::debug!(?team, score = ?self.state.score, "duel ended");
        } else {
            self.state.last_actor = Some(actor);
            self.state.blocked_actor = None;
            self.state.completed_first_turn = true;
            self.state.leader_pointer =
                (self.state.leader_pointer + 1) % self.state.players.len();
            self.state.chosen_actor = None;
            self.state.auto_selected = false;
            self.state.advice = None;
            self.state.engine_move = Move::draw(dice);
            self.state.phase = DuelPhase::SelectingActor;
            self.auto_select_if_forced();
        }
        Ok(outcome)
    }

    /// Compact state snapshot for the shared-screen front end.
    pub fn snapshot(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.state).expect("duel state serialization must succeed")
    }

    /// Apply a snapshot previously produced by `snapshot`. Malformed
    /// bytes are dropped.
    pub fn restore(&mut self, bytes: &[u8]) {
        match rmp_serde::from_slice::<DuelState>(bytes) {
            Ok(state) => self.state = state,
            Err(e) => {
                tracing::debug!(error = %e, "dropped malformed duel snapshot");
            },
        }
    }

    fn require_phase(&self, expected: DuelPhase) -> Result<(), DuelError> {
        if self.state.phase == DuelPhase::Ended {
            return Err(DuelError::Ended);
        }
        if self.state.phase != expected {
            return Err(DuelError::OutOfSequence {
                expected,
                actual: self.state.phase,
            });
        }
        Ok(())
    }

    /// When the constraints leave exactly one legal actor, the pick is
    /// forced; select them without waiting for leader input.
    fn auto_select_if_forced(&mut self) {
        if self.state.phase != DuelPhase::SelectingActor {
            return;
        }
        let eligible = self.eligible_actors();
        if let [only] = eligible[..] {
            self.state.chosen_actor = Some(only);
            self.state.auto_selected = true;
            self.state.phase = DuelPhase::AwaitingAdvice;
            tracing::debug!(actor = only, "actor auto-selected");
        }
    }
}

impl MiniGame for DuelEngine {
    fn metadata(&self) -> MiniGameMetadata {
        MiniGameMetadata {
            name: "Deception Duel",
            min_players: Roster::MIN_PLAYERS as u8,
            max_players: Roster::MAX_PLAYERS as u8,
        }
    }

    fn is_complete(&self) -> bool {
        self.is_terminal()
    }
}
