use drone_console::compute::*;
use drone_console::entities::*;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_state() -> GameState {
    init_state()
}

/// An RNG whose `gen_bool(0.02)` is always false: no monster ever spawns.
fn quiet_rng() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

fn fire() -> Input {
    Input {
        fire: true,
        ..Input::default()
    }
}

fn idle() -> Input {
    Input::default()
}

fn boss_at(x: f32, y: f32, target: (f32, f32)) -> Boss {
    Boss {
        x,
        y,
        health: BOSS_MAX_HEALTH,
        phase: BossPhase::Active,
        origin: (x, y),
        target,
        leg_tick: 0,
        heading: Heading::Outbound,
    }
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = init_state();
    assert_eq!(s.player.x, 350.0);
    assert_eq!(s.player.y, 490.0);
}

#[test]
fn init_state_empty_arena() {
    let s = init_state();
    assert!(s.lasers.is_empty());
    assert!(s.monsters.is_empty());
    assert_eq!(s.boss, BossEncounter::NotYet);
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.stage(), Stage::Running);
}

// ── move_player ───────────────────────────────────────────────────────────────

#[test]
fn move_player_applies_speed_per_direction() {
    let p = Player { x: 100.0, y: 100.0 };
    let up_right = Input {
        up: true,
        right: true,
        ..Input::default()
    };
    let moved = move_player(&p, &up_right);
    assert_eq!(moved.x, 100.0 + PLAYER_SPEED);
    assert_eq!(moved.y, 100.0 - PLAYER_SPEED);
}

#[test]
fn move_player_opposite_keys_cancel() {
    let p = Player { x: 100.0, y: 100.0 };
    let both = Input {
        left: true,
        right: true,
        ..Input::default()
    };
    assert_eq!(move_player(&p, &both), p);
}

#[test]
fn move_player_clamps_at_top_left() {
    let p = Player { x: 2.0, y: 0.0 };
    let input = Input {
        up: true,
        left: true,
        ..Input::default()
    };
    let moved = move_player(&p, &input);
    assert_eq!(moved.x, 0.0);
    assert_eq!(moved.y, 0.0);
}

#[test]
fn move_player_clamps_at_bottom_right() {
    let p = Player {
        x: ARENA_WIDTH - PLAYER_SIZE,
        y: ARENA_HEIGHT - PLAYER_SIZE,
    };
    let input = Input {
        down: true,
        right: true,
        ..Input::default()
    };
    assert_eq!(move_player(&p, &input), p);
}

// ── lasers ────────────────────────────────────────────────────────────────────

#[test]
fn laser_leaves_player_centre() {
    let laser = laser_from(&Player { x: 350.0, y: 490.0 });
    assert_eq!(laser.x, 398.0);
    assert_eq!(laser.y, 490.0);
}

#[test]
fn holding_fire_respects_cooldown() {
    let mut rng = quiet_rng();
    let mut s = make_state();

    s = tick(&s, &fire(), &mut rng);
    assert_eq!(s.lasers.len(), 1);

    // Ticks 2..=20 are still cooling down
    for _ in 1..LASER_COOLDOWN {
        s = tick(&s, &fire(), &mut rng);
    }
    assert_eq!(s.lasers.len(), 1);

    s = tick(&s, &fire(), &mut rng);
    assert_eq!(s.lasers.len(), 2);
}

#[test]
fn laser_moves_up_each_tick() {
    let mut s = make_state();
    s.lasers.push(Laser { x: 100.0, y: 300.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.lasers[0].y, 300.0 - LASER_SPEED);
}

#[test]
fn laser_past_top_is_dropped() {
    let mut s = make_state();
    s.lasers.push(Laser { x: 100.0, y: 2.0 });
    s.lasers.push(Laser { x: 200.0, y: 3.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.lasers.len(), 1);
    assert_eq!(next.lasers[0].x, 200.0);
    assert_eq!(next.lasers[0].y, 0.0);
}

// ── monsters ──────────────────────────────────────────────────────────────────

#[test]
fn monster_falls_each_tick() {
    let mut s = make_state();
    s.monsters.push(Monster { x: 10.0, y: 100.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.monsters[0].y, 100.0 + MONSTER_SPEED);
}

#[test]
fn monster_below_arena_is_removed() {
    let mut s = make_state();
    s.monsters.push(Monster {
        x: 0.0,
        y: ARENA_HEIGHT - 2.0,
    });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert!(next.monsters.is_empty());
    assert_eq!(next.status, GameStatus::Playing);
}

#[test]
fn monster_touching_player_ends_game() {
    let mut s = make_state();
    s.score = 1;
    s.monsters.push(Monster { x: 360.0, y: 450.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.status, GameStatus::GameOver);
    assert_eq!(next.stage(), Stage::GameOver);
    assert_eq!(next.score, 1);
    assert_eq!(next.events, vec![FrameEvent::GameOver]);
}

#[test]
fn laser_kills_monster_and_scores() {
    let mut s = make_state();
    s.monsters.push(Monster { x: 400.0, y: 100.0 });
    s.lasers.push(Laser { x: 410.0, y: 150.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert!(next.monsters.is_empty());
    assert!(next.lasers.is_empty());
    assert_eq!(next.score, 1);
    assert_eq!(next.events, vec![FrameEvent::MonsterKilled]);
}

#[test]
fn one_laser_cannot_kill_two_monsters() {
    let mut s = make_state();
    s.monsters.push(Monster { x: 400.0, y: 100.0 });
    s.monsters.push(Monster { x: 402.0, y: 100.0 });
    s.lasers.push(Laser { x: 410.0, y: 150.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.score, 1);
    assert_eq!(next.monsters.len(), 1);
    assert!(next.lasers.is_empty());
}

#[test]
fn one_monster_is_scored_once() {
    let mut s = make_state();
    s.monsters.push(Monster { x: 400.0, y: 100.0 });
    s.lasers.push(Laser { x: 410.0, y: 150.0 });
    s.lasers.push(Laser { x: 420.0, y: 150.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.score, 1);
    assert_eq!(next.lasers.len(), 1);
}

#[test]
fn spawn_places_monster_at_top() {
    // Always-true gen_bool; gen_range lands on the low end
    let mut rng = StepRng::new(0, 0);
    let next = tick(&make_state(), &idle(), &mut rng);
    assert_eq!(next.monsters.len(), 1);
    assert_eq!(next.monsters[0].y, 0.0);
    assert!(next.monsters[0].x >= 0.0 && next.monsters[0].x < ARENA_WIDTH - MONSTER_SIZE);
}

// ── boss ──────────────────────────────────────────────────────────────────────

#[test]
fn spawn_boss_in_left_quarter() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let boss = spawn_boss(&mut rng);
        assert!(boss.x >= 0.0 && boss.x < 200.0);
        assert_eq!(boss.y, 50.0);
        assert_eq!(boss.health, BOSS_MAX_HEALTH);
        assert_eq!(boss.target, (600.0, 200.0));
        assert_eq!(boss.origin, (boss.x, boss.y));
    }
}

#[test]
fn boss_spawns_on_tick_after_two_kills() {
    let mut s = make_state();
    s.score = 2;
    assert_eq!(s.stage(), Stage::BossPending);
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.stage(), Stage::BossActive);
    assert_eq!(next.events, vec![FrameEvent::BossSpawned]);
    assert_eq!(next.boss_health_fraction(), 1.0);
}

#[test]
fn second_kill_brings_the_boss() {
    let mut s = make_state();
    s.score = 1;
    s.monsters.push(Monster { x: 400.0, y: 100.0 });
    s.lasers.push(Laser { x: 410.0, y: 150.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());

    assert_eq!(next.score, 2);
    assert!(next.events.contains(&FrameEvent::BossSpawned));
    let boss = next.active_boss().expect("boss should be engaged");
    assert!(boss.origin.0 >= 0.0 && boss.origin.0 < 200.0);
    assert_eq!(boss.origin.1, 50.0);
    assert_eq!(next.stage(), Stage::BossActive);
}

#[test]
fn patrol_reaches_target_then_returns() {
    let mut boss = boss_at(0.0, 50.0, (600.0, 200.0));
    for _ in 0..BOSS_LEG_TICKS {
        boss = advance_patrol(&boss);
    }
    assert_eq!((boss.x, boss.y), (600.0, 200.0));
    assert_eq!(boss.heading, Heading::Return);
    assert_eq!(boss.leg_tick, 0);

    for _ in 0..BOSS_LEG_TICKS {
        boss = advance_patrol(&boss);
    }
    assert_eq!((boss.x, boss.y), (0.0, 50.0));
    assert_eq!(boss.heading, Heading::Outbound);
}

#[test]
fn patrol_is_linear() {
    let boss = boss_at(0.0, 0.0, (120.0, 240.0));
    let moved = advance_patrol(&boss);
    assert!((moved.x - 1.0).abs() < 1e-4);
    assert!((moved.y - 2.0).abs() < 1e-4);
    assert_eq!(moved.leg_tick, 1);
}

#[test]
fn twenty_hits_then_phase_two_then_defeat() {
    let mut rng = quiet_rng();
    let mut s = make_state();
    s.boss = BossEncounter::Engaged(boss_at(300.0, 100.0, (600.0, 200.0)));

    for hit in 1..=BOSS_MAX_HEALTH {
        s.lasers.push(Laser { x: 400.0, y: 200.0 });
        s = tick(&s, &idle(), &mut rng);
        assert!(s.lasers.is_empty(), "laser {hit} should be absorbed");
        if hit < BOSS_MAX_HEALTH {
            assert_eq!(s.stage(), Stage::BossActive);
            assert_eq!(s.active_boss().map(|b| b.health), Some(BOSS_MAX_HEALTH - hit));
        }
    }

    assert_eq!(s.stage(), Stage::BossPhase2);
    assert!(s.events.contains(&FrameEvent::BossPhase2));
    let boss = s.active_boss().expect("boss still on screen");
    assert_eq!(boss.health, BOSS_PHASE2_HEALTH);
    assert!(boss.is_defeated_sprite());
    assert_eq!(s.score, 0);

    for _ in 1..BOSS_DEFEAT_DELAY_TICKS {
        s = tick(&s, &idle(), &mut rng);
        assert_eq!(s.stage(), Stage::BossPhase2);
    }

    s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.boss, BossEncounter::Done);
    assert_eq!(s.stage(), Stage::BossDefeated);
    assert_eq!(s.score, BOSS_BONUS);
    assert_eq!(
        s.events,
        vec![FrameEvent::BossDefeated { bonus: BOSS_BONUS }]
    );

    // The bonus is paid once; the next tick is plain running again
    s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.score, BOSS_BONUS);
    assert_eq!(s.stage(), Stage::Running);
}

#[test]
fn phase_two_hits_never_pay_twice() {
    let mut rng = quiet_rng();
    let mut s = make_state();
    let mut boss = boss_at(300.0, 100.0, (300.0, 100.0));
    boss.health = 1;
    s.boss = BossEncounter::Engaged(boss);

    for _ in 0..(BOSS_PHASE2_HEALTH + 3) {
        s.lasers.push(Laser { x: 400.0, y: 200.0 });
        s = tick(&s, &idle(), &mut rng);
        if let Some(boss) = s.active_boss() {
            assert!(boss.health <= BOSS_MAX_HEALTH);
        }
    }
    while s.boss != BossEncounter::Done {
        s = tick(&s, &idle(), &mut rng);
    }
    assert_eq!(s.score, BOSS_BONUS);
}

#[test]
fn boss_touching_player_ends_game_keeping_score() {
    let mut s = make_state();
    s.score = 10;
    s.boss = BossEncounter::Engaged(boss_at(300.0, 400.0, (300.0, 400.0)));
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.status, GameStatus::GameOver);
    assert_eq!(next.score, 10);
    assert!(next.active_boss().is_some());
}

#[test]
fn boss_collision_keeps_kills_from_the_same_tick() {
    let mut s = make_state();
    s.score = 10;
    s.boss = BossEncounter::Engaged(boss_at(300.0, 400.0, (300.0, 400.0)));
    s.monsters.push(Monster { x: 100.0, y: 100.0 });
    s.lasers.push(Laser { x: 110.0, y: 150.0 });
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.status, GameStatus::GameOver);
    assert_eq!(next.score, 11);
    assert_eq!(
        next.events,
        vec![FrameEvent::MonsterKilled, FrameEvent::GameOver]
    );
}

#[test]
fn boss_appears_once_per_session() {
    let mut s = make_state();
    s.score = 40;
    s.boss = BossEncounter::Done;
    let next = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(next.boss, BossEncounter::Done);
    assert!(!next.events.contains(&FrameEvent::BossSpawned));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let next = tick(&make_state(), &idle(), &mut quiet_rng());
    assert_eq!(next.frame, 1);
}

#[test]
fn tick_does_not_mutate_input_state() {
    let mut s = make_state();
    s.monsters.push(Monster { x: 10.0, y: 10.0 });
    let _ = tick(&s, &fire(), &mut quiet_rng());
    assert_eq!(s.frame, 0);
    assert_eq!(s.monsters[0].y, 10.0);
    assert!(s.lasers.is_empty());
}

#[test]
fn tick_after_game_over_is_identity() {
    let mut s = make_state();
    s.status = GameStatus::GameOver;
    s.score = 5;
    s.frame = 99;
    let next = tick(&s, &fire(), &mut quiet_rng());
    assert_eq!(next.frame, 99);
    assert_eq!(next.score, 5);
    assert!(next.lasers.is_empty());
}

#[test]
fn random_play_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut s = make_state();
    let mut last_score = 0;

    for _ in 0..5_000 {
        let input = Input {
            up: rng.gen_bool(0.2),
            down: rng.gen_bool(0.2),
            left: rng.gen_bool(0.4),
            right: rng.gen_bool(0.4),
            fire: rng.gen_bool(0.8),
        };
        s = tick(&s, &input, &mut rng);

        assert!(s.score >= last_score);
        last_score = s.score;
        assert!(s.player.x >= 0.0 && s.player.x <= ARENA_WIDTH - PLAYER_SIZE);
        assert!(s.player.y >= 0.0 && s.player.y <= ARENA_HEIGHT - PLAYER_SIZE);
        assert!(s.lasers.iter().all(|l| l.y >= 0.0));
        if let Some(boss) = s.active_boss() {
            assert!(boss.health <= BOSS_MAX_HEALTH);
        }
        if s.status == GameStatus::GameOver {
            break;
        }
    }
}

/// Player stays on its starting row, below anything the boss patrol can
/// reach, steers under the boss and fires constantly.  Monsters are cleared
/// before every tick so the fight always runs to its end.
#[test]
fn seeded_boss_fights_keep_invariants() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = make_state();
        s.boss = BossEncounter::Engaged(spawn_boss(&mut rng));
        let mut bonuses = 0;
        let mut hits = 0;

        for _ in 0..10_000 {
            s.monsters.clear();
            let aim = s
                .active_boss()
                .map(|b| b.x + (BOSS_SIZE - PLAYER_SIZE) / 2.0)
                .unwrap_or(s.player.x);
            let steer = rng.gen_bool(0.8);
            let input = Input {
                left: steer && s.player.x > aim + PLAYER_SPEED,
                right: steer && s.player.x + PLAYER_SPEED < aim,
                fire: true,
                ..Input::default()
            };
            let was_done = s.boss == BossEncounter::Done;
            s = tick(&s, &input, &mut rng);

            assert_eq!(s.status, GameStatus::Playing);
            assert_eq!(s.player.y, 490.0);
            assert!(!s.events.contains(&FrameEvent::BossSpawned));
            if was_done {
                assert_eq!(s.boss, BossEncounter::Done);
            }
            if let Some(boss) = s.active_boss() {
                assert!(boss.health <= BOSS_MAX_HEALTH);
                if matches!(boss.phase, BossPhase::Phase2 { .. }) {
                    assert!(boss.health <= BOSS_PHASE2_HEALTH);
                }
            }
            for event in &s.events {
                match event {
                    FrameEvent::BossHit { .. } => hits += 1,
                    FrameEvent::BossDefeated { bonus } => {
                        assert_eq!(*bonus, BOSS_BONUS);
                        bonuses += 1;
                    }
                    _ => {}
                }
            }
            assert!(bonuses <= 1);
            assert_eq!(s.score, bonuses * BOSS_BONUS);
        }

        assert_eq!(s.boss, BossEncounter::Done, "seed {seed}");
        assert_eq!(bonuses, 1);
        assert!(hits >= BOSS_MAX_HEALTH);
    }
}
