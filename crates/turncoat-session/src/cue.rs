use serde::{Deserialize, Serialize};

use turncoat_core::player::PlayerId;
use turncoat_core::roles::Team;
use turncoat_duel::moves::{Move, RoundWinner};

/// One beat of the game the front end should present: a screen change,
/// a sound, a spoken line. Cues carry ids and outcomes, never secrets —
/// the role behind a reveal comes from the matching `RoleCard`, handed
/// only to the player being shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    RevealStarted,
    RoleRevealed { player: PlayerId },
    ImpressionsOpened,
    VoteCast { voter: PlayerId, suspect: PlayerId },
    MostSuspected { suspect: PlayerId, count: usize },
    DuelStarted,
    TurnStarted { leader: PlayerId },
    ActorChosen { actor: PlayerId, auto: bool },
    AdviceGiven { leader: PlayerId, advice: Move },
    InterventionCalled,
    InterventionResolved { approved: bool },
    TurnResolved {
        actor: PlayerId,
        actor_move: Move,
        engine_move: Move,
        result: RoundWinner,
    },
    TieBonus { team: Team },
    Victory { team: Team },
}

/// The rendering/audio collaborator the session talks to. Injected at
/// construction; the core never reaches for ambient state.
pub trait FrontEnd {
    fn cue(&mut self, cue: Cue);
}

/// Front end that discards every cue.
#[derive(Debug, Default)]
pub struct NullFrontEnd;

impl FrontEnd for NullFrontEnd {
    fn cue(&mut self, _cue: Cue) {}
}

/// Recording front end, handy in tests and replay tooling.
impl FrontEnd for Vec<Cue> {
    fn cue(&mut self, cue: Cue) {
        self.push(cue);
    }
}
