//! End-to-end session runs: lobby to victory screen through the public
//! session API only.

use turncoat_core::dice::SeededDice;
use turncoat_core::roles::{Role, Team};
use turncoat_core::test_helpers::{ScriptedDice, make_roster};
use turncoat_duel::config::DuelConfig;
use turncoat_duel::moves::Move;
use turncoat_duel::DuelPhase;
use turncoat_session::{Cue, Session, SessionPhase};

/// Three players on scripted dice: the engine always throws Rock, so an
/// actor answering Paper wins every exchange and Good reaches its
/// target in four turns.
#[test]
fn scripted_three_player_game_ends_in_good_victory() {
    let mut session = Session::with_config(
        DuelConfig::default(),
        make_roster(3),
        Box::new(ScriptedDice::empty()),
        Vec::new(),
    );

    let assignment = session.start().unwrap();
    assert_eq!(assignment.bad_players(), vec![0]);
    assert!(assignment.players.iter().all(|p| p.partner.is_none()));

    let mut cards = Vec::new();
    while let Some(card) = session.next_reveal().unwrap() {
        cards.push(card);
    }
    assert_eq!(cards.len(), 3);
    assert_eq!(
        cards.iter().filter(|c| c.role == Role::Bad).count(),
        1
    );

    for voter in 0..3 {
        session.cast_impression(voter, (voter + 1) % 3).unwrap();
    }
    assert_eq!(session.phase(), SessionPhase::Duel);

    // Scripted shuffles leave the leader order at [1, 2, 0], so turn one
    // offers actors {0, 2}. Every later turn has exactly one eligible
    // actor and auto-selects, thanks to the back-to-back ban.
    let view = session.duel_view().unwrap();
    assert_eq!(view.leader, 1);
    assert_eq!(session.eligible_actors().unwrap(), vec![0, 2]);
    session.select_actor(0).unwrap();

    for turn in 0..4 {
        let view = session.duel_view().unwrap();
        assert_eq!(view.phase, DuelPhase::AwaitingAdvice);
        assert!(view.chosen_actor.is_some());
        session.propose_advice(Move::Rock).unwrap();
        let outcome = session.submit_actor_move(Move::Paper).unwrap();
        assert_eq!(outcome.engine_move, Move::Rock);
        assert_eq!(outcome.score.good, turn + 1);
    }

    assert!(session.is_finished());
    assert_eq!(session.outcome(), Some(Team::Good));
    let cues = session.front_end();
    assert_eq!(cues.first(), Some(&Cue::RevealStarted));
    assert_eq!(cues.last(), Some(&Cue::Victory { team: Team::Good }));
    assert_eq!(
        cues.iter()
            .filter(|c| matches!(c, Cue::Victory { .. }))
            .count(),
        1
    );
    assert!(cues.contains(&Cue::TurnStarted { leader: 1 }));
}

/// A six-player game on real entropy-free seeded dice, driven by a
/// simple policy until someone wins. Interventions are always approved
/// so the run cannot stall on a veto loop.
#[test]
fn seeded_six_player_game_runs_to_completion() {
    let mut session = Session::with_config(
        DuelConfig::default(),
        make_roster(6),
        Box::new(SeededDice::seeded(2024)),
        Vec::new(),
    );

    session.start().unwrap();
    while session.next_reveal().unwrap().is_some() {}
    for voter in 0..6 {
        session.cast_impression(voter, (voter + 1) % 6).unwrap();
    }
    assert_eq!(session.phase(), SessionPhase::Duel);

    let mut steps = 0;
    while !session.is_finished() {
        steps += 1;
        assert!(steps < 10_000, "game failed to terminate");
        let view = session.duel_view().unwrap();
        match view.phase {
            DuelPhase::SelectingActor => {
                let actor = session.eligible_actors().unwrap()[0];
                session.select_actor(actor).unwrap();
            },
            DuelPhase::AwaitingAdvice => {
                session.propose_advice(Move::Paper).unwrap();
            },
            DuelPhase::Intervention => {
                for voter in view.pending_voters {
                    session.cast_intervention_vote(voter, true).unwrap();
                }
            },
            DuelPhase::AwaitingMove => {
                session.submit_actor_move(Move::Scissors).unwrap();
            },
            DuelPhase::Ended => unreachable!("session should finish with the duel"),
        }
    }

    let winner = session.outcome().unwrap();
    let cues = session.front_end();
    assert_eq!(cues.last(), Some(&Cue::Victory { team: winner }));

    // Every resolved turn names an actor distinct from its leader.
    let mut leader = None;
    for cue in cues {
        match cue {
            Cue::TurnStarted { leader: l } => leader = Some(*l),
            Cue::TurnResolved { actor, .. } => assert_ne!(Some(*actor), leader),
            _ => {},
        }
    }
}
