mod common;

use game_core::{
    Combatant, DiceType, EffectType, ErrorKind, GameError, HeroId, QuestId, SessionId,
    SessionStatus, TurnSide,
};
use runtime::{CombatOutcome, Event, OutcomeEvent, RuntimeError, SessionEvent, Topic};

use common::{GOBLIN_WARREN, PLAYER, config, party, runtime, won_session};

#[tokio::test]
async fn start_combat_returns_an_in_progress_snapshot() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();

    let started = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap();

    let session = &started.session;
    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.turn, TurnSide::Hero);
    assert_eq!(session.hero_ids(), party());
    assert_eq!(session.seed, 7);
    assert_eq!(started.outcome.enemy_health, 30);
    assert!(
        session
            .heroes
            .iter()
            .all(|hero| hero.health.current() == hero.health.max())
    );
    assert_eq!(handle.session(session.id).unwrap(), *session);
}

#[tokio::test]
async fn invalid_start_requests_leave_no_session() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();

    let empty = handle
        .start_combat(PLAYER, GOBLIN_WARREN, Vec::new())
        .await
        .unwrap_err();
    assert_eq!(empty.kind(), ErrorKind::InvalidRequest);

    let unknown_quest = handle
        .start_combat(PLAYER, QuestId(99), party())
        .await
        .unwrap_err();
    assert_eq!(unknown_quest.kind(), ErrorKind::NotFound);

    let unknown_hero = handle
        .start_combat(PLAYER, GOBLIN_WARREN, vec![HeroId(1), HeroId(42)])
        .await
        .unwrap_err();
    assert_eq!(unknown_hero.kind(), ErrorKind::NotFound);

    assert!(handle.list_sessions().unwrap().is_empty());
}

#[tokio::test]
async fn a_full_encounter_ends_in_victory_and_pays_out_once() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = won_session(&handle).await;

    let victory = handle.session(id).unwrap();
    assert!(!victory.rewards_claimed);
    assert_eq!(victory.defeated_enemies.len(), 2);
    assert!(victory.timestamps.completed_at.is_some());

    let completion = handle.complete_combat(id).await.unwrap();
    assert_eq!(completion.status, CombatOutcome::Victory);
    assert_eq!(completion.gold_earned, 50);
    assert_eq!(completion.experience_earned, 80);
    assert!(completion.dropped_items.is_empty());
    assert!(completion.session.rewards_claimed);
    assert!(completion.session.archived);

    let again = handle.complete_combat(id).await.unwrap_err();
    assert_eq!(again.kind(), ErrorKind::Conflict);
    assert!(handle.session(id).unwrap().rewards_claimed);
}

#[tokio::test]
async fn turn_order_is_enforced() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap()
        .session
        .id;

    let early = handle.enemy_attack(id).await.unwrap_err();
    assert_eq!(early.kind(), ErrorKind::InvalidState);

    let rolled = handle.roll_dice(id, DiceType::D20).await.unwrap();
    assert!(rolled.outcome.success);
    assert_eq!(rolled.outcome.roll, 20);
    assert_eq!(rolled.outcome.hero, HeroId(1));
    assert_eq!(rolled.session.turn, TurnSide::Enemy);

    let twice = handle.roll_dice(id, DiceType::D20).await.unwrap_err();
    assert_eq!(twice.kind(), ErrorKind::InvalidState);
    assert_eq!(handle.session(id).unwrap().nonce, rolled.session.nonce);

    let attack = handle.enemy_attack(id).await.unwrap();
    assert_eq!(attack.outcome.target, Some(HeroId(2)));
    assert_eq!(attack.session.turn, TurnSide::Hero);
}

#[tokio::test]
async fn completing_an_unfinished_session_is_invalid() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap()
        .session
        .id;

    let err = handle.complete_combat(id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(!handle.session(id).unwrap().rewards_claimed);
}

#[tokio::test]
async fn cancelled_sessions_reject_further_actions() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap()
        .session
        .id;

    let cancelled = handle.cancel_combat(id).await.unwrap();
    assert_eq!(cancelled.outcome.previous, SessionStatus::InProgress);
    assert_eq!(cancelled.session.status, SessionStatus::Cancelled);
    assert_eq!(
        CombatOutcome::from_status(cancelled.session.status),
        Some(CombatOutcome::Fled)
    );

    let roll = handle.roll_dice(id, DiceType::D6).await.unwrap_err();
    assert_eq!(roll.kind(), ErrorKind::InvalidState);
    let cancel = handle.cancel_combat(id).await.unwrap_err();
    assert_eq!(cancel.kind(), ErrorKind::InvalidState);
    let complete = handle.complete_combat(id).await.unwrap_err();
    assert_eq!(complete.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn unknown_sessions_are_not_found() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();

    let err = handle.roll_dice(SessionId(404), DiceType::D20).await.unwrap_err();
    assert!(matches!(err, RuntimeError::SessionNotFound(SessionId(404))));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(handle.session(SessionId(404)).is_err());
    assert!(handle.combat_log(SessionId(404)).is_err());
}

#[tokio::test]
async fn special_abilities_go_on_cooldown() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap()
        .session
        .id;

    let cleave = handle.use_special_ability(id, HeroId(1)).await.unwrap();
    assert!(cleave.outcome.success);
    assert!(cleave.outcome.damage_dealt > 0);
    assert!(cleave.outcome.cooldown_remaining > 0);
    assert_eq!(cleave.session.turn, TurnSide::Enemy);

    handle.enemy_attack(id).await.unwrap();
    let again = handle.use_special_ability(id, HeroId(1)).await.unwrap_err();
    assert_eq!(again.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn status_effects_stack_on_the_target() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap()
        .session
        .id;
    let target = Combatant::Hero(HeroId(2));

    let first = handle
        .apply_status_effect(id, target, EffectType::Poison, 3, 1)
        .await
        .unwrap();
    assert!(first.outcome.success);
    assert_eq!(first.outcome.intensity, 1);

    let second = handle
        .apply_status_effect(id, target, EffectType::Poison, 2, 1)
        .await
        .unwrap();
    assert!(second.outcome.success);
    assert_eq!(second.outcome.intensity, 2);
    assert_eq!(second.session.nonce, first.session.nonce + 1);
}

#[tokio::test]
async fn events_report_each_action_and_one_conclusion() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let mut combat = runtime.subscribe(Topic::Combat);
    let mut outcomes = runtime.subscribe(Topic::Outcome);

    let id = won_session(&handle).await;
    handle.complete_combat(id).await.unwrap();
    let _ = handle.complete_combat(id).await;

    let mut resolved = 0;
    let mut rejected = 0;
    while let Ok(event) = combat.try_recv() {
        match event {
            Event::Combat(SessionEvent::ActionResolved { session, .. }) => {
                assert_eq!(session, id);
                resolved += 1;
            }
            Event::Combat(SessionEvent::ActionRejected { kind, .. }) => {
                assert_eq!(kind, ErrorKind::Conflict);
                rejected += 1;
            }
            other => panic!("unexpected combat event {other:?}"),
        }
    }
    let final_nonce = handle.session(id).unwrap().nonce;
    assert_eq!(resolved, final_nonce);
    assert_eq!(rejected, 1);

    let mut concluded = Vec::new();
    let mut claimed = Vec::new();
    while let Ok(event) = outcomes.try_recv() {
        match event {
            Event::Outcome(OutcomeEvent::SessionConcluded { session, status, .. }) => {
                concluded.push((session, status))
            }
            Event::Outcome(OutcomeEvent::RewardsClaimed { session, gold, .. }) => {
                claimed.push((session, gold))
            }
            other => panic!("unexpected outcome event {other:?}"),
        }
    }
    assert_eq!(concluded, vec![(id, SessionStatus::Victory)]);
    assert_eq!(claimed, vec![(id, 50)]);
}

#[tokio::test]
async fn combat_log_chains_to_the_session_digest() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();
    let id = won_session(&handle).await;
    let session = handle.session(id).unwrap();

    let log = handle.combat_log(id).unwrap();
    assert!(!log.is_empty());
    for (expected, entry) in (0u64..).zip(&log) {
        assert_eq!(entry.sequence, expected);
        assert_eq!(entry.session, id);
    }

    let mut digest = [0u8; 32];
    for entry in &log {
        digest = entry.record.chain_digest(&digest);
        assert_eq!(entry.digest, hex::encode(digest));
    }
    assert_eq!(digest, session.log_digest);
}

#[tokio::test]
async fn sessions_resolve_independently() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();

    let (first, second) = tokio::join!(won_session(&handle), won_session(&handle));
    assert_ne!(first, second);

    let mut ids = handle.list_sessions().unwrap();
    ids.sort();
    assert_eq!(ids, vec![SessionId(1), SessionId(2)]);
    assert_eq!(
        handle.session(first).unwrap().log_digest,
        handle.session(second).unwrap().log_digest
    );

    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn settled_sessions_release_their_workers() {
    let runtime = runtime(config()).await;
    let handle = runtime.handle();

    let cancelled = handle
        .start_combat(PLAYER, GOBLIN_WARREN, party())
        .await
        .unwrap()
        .session
        .id;
    let won = won_session(&handle).await;
    // An unclaimed victory still has a command left.
    assert_eq!(handle.active_workers().await, 2);

    handle.cancel_combat(cancelled).await.unwrap();
    assert_eq!(handle.active_workers().await, 1);

    handle.complete_combat(won).await.unwrap();
    assert_eq!(handle.active_workers().await, 0);

    let err = handle.roll_dice(cancelled, DiceType::D20).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(handle.active_workers().await, 0);

    runtime.shutdown().await.unwrap();
}
