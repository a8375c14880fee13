//! Session orchestration: one full Turncoat game from roster to victory
//! screen. The session owns the role assignment, the First Impressions
//! round, and the Deception Duel, advances through them in order, and
//! narrates every beat to the injected [`FrontEnd`].
//!
//! All collaborators — dice, front end, duel config — are passed in at
//! construction; nothing is looked up from ambient state.

pub mod cue;

use uuid::Uuid;

use turncoat_core::dice::Dice;
use turncoat_core::game::MiniGame;
use turncoat_core::player::PlayerId;
use turncoat_core::roles::{Role, RoleAssignment, Team, assign_roles};
use turncoat_core::roster::{Roster, RosterError};
use turncoat_duel::config::DuelConfig;
use turncoat_duel::moves::Move;
use turncoat_duel::{DuelEngine, DuelError, DuelPhase, DuelView, InterventionOutcome, TurnOutcome};
use turncoat_impressions::{ImpressionsRound, Tally, VoteError};

pub use cue::{Cue, FrontEnd, NullFrontEnd};

/// Where the session is in the evening's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SessionPhase {
    Lobby,
    RoleReveal,
    FirstImpressions,
    Duel,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Operation belongs to a different phase of the session.
    OutOfPhase {
        expected: SessionPhase,
        actual: SessionPhase,
    },
    UnknownPlayer(PlayerId),
    Roster(RosterError),
    Vote(VoteError),
    Duel(DuelError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfPhase { expected, actual } => {
                write!(f, "operation expects phase {expected:?} but session is in {actual:?}")
            },
            Self::UnknownPlayer(id) => write!(f, "no player with id {id}"),
            Self::Roster(e) => e.fmt(f),
            Self::Vote(e) => e.fmt(f),
            Self::Duel(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Roster(e) => Some(e),
            Self::Vote(e) => Some(e),
            Self::Duel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RosterError> for SessionError {
    fn from(e: RosterError) -> Self {
        Self::Roster(e)
    }
}

impl From<VoteError> for SessionError {
    fn from(e: VoteError) -> Self {
        Self::Vote(e)
    }
}

impl From<DuelError> for SessionError {
    fn from(e: DuelError) -> Self {
        Self::Duel(e)
    }
}

/// What one player is privately shown during the reveal sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleCard {
    pub player: PlayerId,
    pub role: Role,
    /// The fellow Bad player, when partner knowledge applies.
    pub partner: Option<PlayerId>,
}

/// One game session on the shared screen.
pub struct Session<F: FrontEnd> {
    id: Uuid,
    phase: SessionPhase,
    roster: Roster,
    dice: Box<dyn Dice>,
    front_end: F,
    duel_config: DuelConfig,
    assignment: Option<RoleAssignment>,
    reveal_cursor: usize,
    impressions: Option<ImpressionsRound>,
    duel: Option<DuelEngine>,
}

impl<F: FrontEnd> Session<F> {
    pub fn new(roster: Roster, dice: Box<dyn Dice>, front_end: F) -> Self {
        Self::with_config(DuelConfig::load(), roster, dice, front_end)
    }

    pub fn with_config(
        duel_config: DuelConfig,
        roster: Roster,
        dice: Box<dyn Dice>,
        front_end: F,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Lobby,
            roster,
            dice,
            front_end,
            duel_config,
            assignment: None,
            reveal_cursor: 0,
            impressions: None,
            duel: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn front_end(&self) -> &F {
        &self.front_end
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// The duel verdict, once the session has finished.
    pub fn outcome(&self) -> Option<Team> {
        self.duel.as_ref().and_then(|d| d.outcome())
    }

    /// Deal secret roles and open the reveal sequence.
    pub fn start(&mut self) -> Result<&RoleAssignment, SessionError> {
        self.require_phase(SessionPhase::Lobby)?;
        let assignment = assign_roles(&self.roster, self.dice.as_mut())?;
        self.phase = SessionPhase::RoleReveal;
        self.front_end.cue(Cue::RevealStarted);
        tracing::debug!(session = %self.id, players = self.roster.len(), "roles dealt");
        Ok(&*self.assignment.insert(assignment))
    }

    /// The next player's private role card, or `None` once every card
    /// has been shown — which opens the First Impressions round.
    pub fn next_reveal(&mut self) -> Result<Option<RoleCard>, SessionError> {
        self.require_phase(SessionPhase::RoleReveal)?;
        let Some(assignment) = self.assignment.as_ref() else {
            return Err(self.out_of_phase(SessionPhase::RoleReveal));
        };

        if let Some(&id) = assignment.reveal_order.get(self.reveal_cursor) {
            self.reveal_cursor += 1;
            let player = assignment.player(id).ok_or(SessionError::UnknownPlayer(id))?;
            let role = player.role.ok_or(SessionError::UnknownPlayer(id))?;
            let card = RoleCard {
                player: id,
                role,
                partner: player.partner,
            };
            self.front_end.cue(Cue::RoleRevealed { player: id });
            return Ok(Some(card));
        }

        self.impressions = Some(ImpressionsRound::new(&self.roster, self.dice.as_mut()));
        self.phase = SessionPhase::FirstImpressions;
        self.front_end.cue(Cue::ImpressionsOpened);
        Ok(None)
    }

    /// The player the shared screen should prompt for a suspicion vote.
    pub fn next_voter(&self) -> Result<Option<PlayerId>, SessionError> {
        self.require_phase(SessionPhase::FirstImpressions)?;
        Ok(self.impressions.as_ref().and_then(|r| r.next_voter()))
    }

    /// Record one suspicion vote. Completing the round starts the duel.
    pub fn cast_impression(
        &mut self,
        voter: PlayerId,
        suspect: PlayerId,
    ) -> Result<(), SessionError> {
        self.require_phase(SessionPhase::FirstImpressions)?;
        let Some(round) = self.impressions.as_mut() else {
            return Err(self.out_of_phase(SessionPhase::FirstImpressions));
        };
        round.cast_vote(voter, suspect)?;
        self.front_end.cue(Cue::VoteCast { voter, suspect });

        if round.is_complete() {
            tracing::debug!(game = round.metadata().name, "mini-game complete");
            if let Some(ms) = round.tally().most_suspected {
                self.front_end.cue(Cue::MostSuspected {
                    suspect: ms.suspect,
                    count: ms.count,
                });
            }
            self.begin_duel()?;
        }
        Ok(())
    }

    /// The vote list and most-suspected aggregate, available from the
    /// First Impressions round onward.
    pub fn impressions_tally(&self) -> Result<Tally, SessionError> {
        match &self.impressions {
            Some(round) => Ok(round.tally()),
            None => Err(self.out_of_phase(SessionPhase::FirstImpressions)),
        }
    }

    pub fn duel_view(&self) -> Result<DuelView, SessionError> {
        Ok(self.duel_ref()?.view())
    }

    pub fn eligible_actors(&self) -> Result<Vec<PlayerId>, SessionError> {
        Ok(self.duel_ref()?.eligible_actors())
    }

    pub fn select_actor(&mut self, actor: PlayerId) -> Result<DuelView, SessionError> {
        self.require_phase(SessionPhase::Duel)?;
        let Some(duel) = self.duel.as_mut() else {
            return Err(SessionError::OutOfPhase {
                expected: SessionPhase::Duel,
                actual: self.phase,
            });
        };
        let view = duel.select_actor(actor)?;
        self.front_end.cue(Cue::ActorChosen { actor, auto: false });
        Ok(view)
    }

    pub fn propose_advice(&mut self, advice: Move) -> Result<DuelView, SessionError> {
        self.require_phase(SessionPhase::Duel)?;
        let Some(duel) = self.duel.as_mut() else {
            return Err(SessionError::OutOfPhase {
                expected: SessionPhase::Duel,
                actual: self.phase,
            });
        };
        let view = duel.propose_advice(advice, self.dice.as_mut())?;
        self.front_end.cue(Cue::AdviceGiven {
            leader: view.leader,
            advice,
        });
        if view.phase == DuelPhase::Intervention {
            self.front_end.cue(Cue::InterventionCalled);
        }
        Ok(view)
    }

    pub fn cast_intervention_vote(
        &mut self,
        voter: PlayerId,
        approve: bool,
    ) -> Result<InterventionOutcome, SessionError> {
        self.require_phase(SessionPhase::Duel)?;
        let Some(duel) = self.duel.as_mut() else {
            return Err(SessionError::OutOfPhase {
                expected: SessionPhase::Duel,
                actual: self.phase,
            });
        };
        let outcome = duel.cast_intervention_vote(voter, approve, self.dice.as_mut())?;
        match outcome {
            InterventionOutcome::Pending { .. } => {},
            InterventionOutcome::Approved => {
                self.front_end.cue(Cue::InterventionResolved { approved: true });
            },
            InterventionOutcome::Vetoed => {
                self.front_end.cue(Cue::InterventionResolved { approved: false });
                self.cue_auto_selection();
            },
        }
        Ok(outcome)
    }

    pub fn submit_actor_move(&mut self, actor_move: Move) -> Result<TurnOutcome, SessionError> {
        self.require_phase(SessionPhase::Duel)?;
        let Some(duel) = self.duel.as_mut() else {
            return Err(SessionError::OutOfPhase {
                expected: SessionPhase::Duel,
                actual: self.phase,
            });
        };
        let outcome = duel.submit_actor_move(actor_move, self.dice.as_mut())?;
        self.front_end.cue(Cue::TurnResolved {
            actor: outcome.actor,
            actor_move: outcome.actor_move,
            engine_move: outcome.engine_move,
            result: outcome.result,
        });
        if let Some(team) = outcome.tie_bonus {
            self.front_end.cue(Cue::TieBonus { team });
        }

        if let Some(team) = outcome.winner {
            if let Some(duel) = self.duel.as_ref() {
                tracing::debug!(game = duel.metadata().name, "mini-game complete");
            }
            self.phase = SessionPhase::Finished;
            self.front_end.cue(Cue::Victory { team });
        } else {
            self.cue_turn_start();
        }
        Ok(outcome)
    }

    fn begin_duel(&mut self) -> Result<(), SessionError> {
        let Some(assignment) = self.assignment.as_ref() else {
            return Err(self.out_of_phase(SessionPhase::FirstImpressions));
        };
        let duel = DuelEngine::new(
            assignment.players.clone(),
            self.duel_config.clone(),
            self.dice.as_mut(),
        )?;
        self.duel = Some(duel);
        self.phase = SessionPhase::Duel;
        self.front_end.cue(Cue::DuelStarted);
        self.cue_turn_start();
        Ok(())
    }

    fn cue_turn_start(&mut self) {
        if let Some(duel) = self.duel.as_ref() {
            let leader = duel.leader();
            self.front_end.cue(Cue::TurnStarted { leader });
        }
        self.cue_auto_selection();
    }

    fn cue_auto_selection(&mut self) {
        if let Some(duel) = self.duel.as_ref() {
            let view = duel.view();
            if view.auto_selected
                && let Some(actor) = view.chosen_actor
            {
                self.front_end.cue(Cue::ActorChosen { actor, auto: true });
            }
        }
    }

    fn duel_ref(&self) -> Result<&DuelEngine, SessionError> {
        self.duel
            .as_ref()
            .ok_or_else(|| self.out_of_phase(SessionPhase::Duel))
    }

    fn require_phase(&self, expected: SessionPhase) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(self.out_of_phase(expected));
        }
        Ok(())
    }

    fn out_of_phase(&self, expected: SessionPhase) -> SessionError {
        SessionError::OutOfPhase {
            expected,
            actual: self.phase,
        }
    }
}
