use drone_console::compute::init_state;
use drone_console::entities::*;

use rstest::rstest;

fn boss(health: u32, phase: BossPhase) -> Boss {
    Boss {
        x: 0.0,
        y: 50.0,
        health,
        phase,
        origin: (0.0, 50.0),
        target: (600.0, 200.0),
        leg_tick: 0,
        heading: Heading::Outbound,
    }
}

#[rstest]
#[case::overlap(Rect::new(10.0, 10.0, 20.0, 20.0), true)]
#[case::touching_right_edge(Rect::new(50.0, 0.0, 10.0, 10.0), true)]
#[case::touching_corner(Rect::new(50.0, 50.0, 10.0, 10.0), true)]
#[case::contained(Rect::new(5.0, 5.0, 1.0, 1.0), true)]
#[case::left_of(Rect::new(-20.0, 0.0, 19.0, 10.0), false)]
#[case::below(Rect::new(0.0, 51.0, 50.0, 50.0), false)]
fn rect_intersection(#[case] other: Rect, #[case] expected: bool) {
    let base = Rect::new(0.0, 0.0, 50.0, 50.0);
    assert_eq!(base.intersects(&other), expected);
    assert_eq!(other.intersects(&base), expected);
}

#[test]
fn bounds_use_sprite_sizes() {
    let p = Player { x: 1.0, y: 2.0 };
    assert_eq!(p.bounds(), Rect::new(1.0, 2.0, PLAYER_SIZE, PLAYER_SIZE));
    let l = Laser { x: 3.0, y: 4.0 };
    assert_eq!(l.bounds(), Rect::new(3.0, 4.0, LASER_WIDTH, LASER_HEIGHT));
    let m = Monster { x: 5.0, y: 6.0 };
    assert_eq!(m.bounds(), Rect::new(5.0, 6.0, MONSTER_SIZE, MONSTER_SIZE));
    let b = boss(BOSS_MAX_HEALTH, BossPhase::Active);
    assert_eq!(b.bounds(), Rect::new(0.0, 50.0, BOSS_SIZE, BOSS_SIZE));
}

#[test]
fn health_fraction_tracks_health() {
    assert_eq!(boss(20, BossPhase::Active).health_fraction(), 1.0);
    assert_eq!(boss(10, BossPhase::Active).health_fraction(), 0.5);
    assert_eq!(
        boss(BOSS_PHASE2_HEALTH, BossPhase::Phase2 { defeat_in: 5 }).health_fraction(),
        0.2
    );
}

#[test]
fn defeated_sprite_only_in_phase_two() {
    assert!(!boss(3, BossPhase::Active).is_defeated_sprite());
    assert!(boss(3, BossPhase::Phase2 { defeat_in: 1 }).is_defeated_sprite());
}

#[test]
fn no_boss_means_empty_health_bar() {
    let s = init_state();
    assert!(s.active_boss().is_none());
    assert_eq!(s.boss_health_fraction(), 0.0);
}

#[test]
fn stage_follows_boss_lifecycle() {
    let mut s = init_state();
    assert_eq!(s.stage(), Stage::Running);

    s.score = 2;
    assert_eq!(s.stage(), Stage::BossPending);

    s.boss = BossEncounter::Engaged(boss(20, BossPhase::Active));
    assert_eq!(s.stage(), Stage::BossActive);

    s.boss = BossEncounter::Engaged(boss(4, BossPhase::Phase2 { defeat_in: 3 }));
    assert_eq!(s.stage(), Stage::BossPhase2);

    s.boss = BossEncounter::Done;
    s.events = vec![FrameEvent::BossDefeated { bonus: 35 }];
    assert_eq!(s.stage(), Stage::BossDefeated);

    s.events.clear();
    assert_eq!(s.stage(), Stage::Running);

    s.status = GameStatus::GameOver;
    assert_eq!(s.stage(), Stage::GameOver);
}

#[test]
fn game_state_clone_is_independent() {
    let mut original = init_state();
    original.monsters.push(Monster { x: 1.0, y: 1.0 });
    let mut copy = original.clone();
    copy.monsters[0].y = 99.0;
    copy.score = 7;
    assert_eq!(original.monsters[0].y, 1.0);
    assert_eq!(original.score, 0);
}

#[test]
fn default_input_is_idle() {
    let input = Input::default();
    assert!(!input.up && !input.down && !input.left && !input.right && !input.fire);
}
