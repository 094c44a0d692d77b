//! Wholesale restart and the generation guard

use super::fixtures::{self, DT};
use crate::entities::EntityKind;
use crate::events::{Generation, TimerQueue};
use crate::foundation::math::Vec2;
use crate::movement::InputState;
use crate::render::{RenderCommand, TextSlot};

#[test]
fn test_hazard_resets_progress() {
    let mut session = fixtures::session();
    let mut timers = TimerQueue::new();
    let coins = fixtures::keys(&session, EntityKind::Coin);
    let total_coins = coins.len();

    for coin in &coins[..15] {
        session.handle_overlap(*coin, &mut timers).unwrap();
    }
    let key = fixtures::first(&session, EntityKind::Key);
    session.handle_overlap(key, &mut timers).unwrap();
    assert!(session.player().has_key);
    assert!(session.tracker().power_up_active());

    let water = fixtures::first(&session, EntityKind::Hazard);
    session.handle_overlap(water, &mut timers).unwrap();

    assert_eq!(session.generation(), Generation::FIRST.next());
    assert_eq!(session.tracker().coin_count(), 0);
    assert!(!session.tracker().power_up_active());
    assert!(!session.player().has_key);
    assert_eq!(session.registry().live_count(EntityKind::Coin), total_coins);
    assert_eq!(session.registry().live_count(EntityKind::Key), 1);

    let commands = session.drain_render_commands();
    let reset = commands.iter().position(|c| *c == RenderCommand::ResetScene).unwrap();
    assert!(commands[reset..].contains(&RenderCommand::SetText {
        slot: TextSlot::Coins,
        text: "Coins: 0".to_string()
    }));
}

#[test]
fn test_old_power_up_timer_cannot_end_new_power_up() {
    let mut runner = fixtures::runner();
    fixtures::collect_power_up(&mut runner);

    fixtures::idle_until(&mut runner, 5.0);
    runner.restart().unwrap();
    assert!(!runner.session().tracker().power_up_active());

    fixtures::collect_power_up(&mut runner);
    assert_eq!(runner.timers().len(), 2);

    // The first session's expiry fires here and must be ignored
    fixtures::idle_until(&mut runner, 10.0);
    assert!(runner.session().tracker().power_up_active());
    assert_eq!(runner.timers().len(), 1);

    fixtures::idle_until(&mut runner, 15.0 - f64::from(DT));
    assert!(runner.session().tracker().power_up_active());
    runner.tick(fixtures::idle(), DT).unwrap();
    assert!(!runner.session().tracker().power_up_active());
}

#[test]
fn test_old_banner_timer_is_dropped() {
    let mut session = fixtures::session();
    let mut timers = TimerQueue::new();
    let key = fixtures::first(&session, EntityKind::Key);
    let lock = fixtures::first(&session, EntityKind::Lock);
    session.handle_overlap(key, &mut timers).unwrap();
    session.handle_overlap(lock, &mut timers).unwrap();

    session.restart().unwrap();
    session.drain_render_commands();

    timers.update_time(2.0);
    for scheduled in timers.take_due() {
        assert!(!session.on_deferred(scheduled.generation, scheduled.event));
    }
    assert!(session.drain_render_commands().is_empty());
}

#[test]
fn test_restart_key() {
    let mut runner = fixtures::runner();
    runner.tick(InputState { right: true, ..Default::default() }, DT).unwrap();

    let report = runner.tick(InputState { restart: true, ..Default::default() }, DT).unwrap();
    assert!(report.restarted);
    assert_eq!(report.commands.first(), Some(&RenderCommand::ResetScene));
    assert!(report.commands.iter().any(|c| matches!(c, RenderCommand::SpawnPlayer { .. })));
    assert_eq!(runner.session().generation(), Generation::FIRST.next());

    let spawn = runner.session().spawn_point();
    assert_eq!(runner.body().position, spawn);
    assert_eq!(runner.body().velocity, Vec2::zeros());
}

#[test]
fn test_standing_in_water_respawns_player() {
    let mut runner = fixtures::runner();
    fixtures::teleport(&mut runner, Vec2::new(fixtures::TILE * 11.5, fixtures::SAFE_SPOT.1));

    let report = runner.tick(fixtures::idle(), DT).unwrap();
    assert!(report.restarted);
    assert!(report.commands.contains(&RenderCommand::ResetScene));
    assert_eq!(runner.body().position, runner.session().spawn_point());
}
