//! Pure minigame logic.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! value.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Boss, BossEncounter, BossPhase, FrameEvent, GameState, GameStatus, Heading, Input, Laser,
    Monster, Player, ARENA_HEIGHT, ARENA_WIDTH, BOSS_MAX_HEALTH, BOSS_PHASE2_HEALTH, BOSS_SIZE,
    LASER_WIDTH, MONSTER_SIZE, PLAYER_SIZE,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

/// The engine assumes one tick per rendered frame at this rate.
pub const TICKS_PER_SECOND: u32 = 60;

pub const PLAYER_SPEED: f32 = 5.0;
pub const MONSTER_SPEED: f32 = 4.0;
pub const LASER_SPEED: f32 = 3.0;

/// Ticks between two shots while fire is held.
pub const LASER_COOLDOWN: u32 = 20;

/// Chance per tick that a new monster drops in.
pub const MONSTER_SPAWN_CHANCE: f64 = 0.02;

pub const BOSS_TRIGGER_SCORE: u32 = 2;
pub const BOSS_BONUS: u32 = 35;

/// One leg of the boss patrol takes two seconds.
pub const BOSS_LEG_TICKS: u32 = 2 * TICKS_PER_SECOND;

/// 0.3 s between the boss breaking and it leaving the arena.
pub const BOSS_DEFEAT_DELAY_TICKS: u32 = TICKS_PER_SECOND * 3 / 10;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state of a session: player parked bottom-centre,
/// empty arena, no boss yet.
pub fn init_state() -> GameState {
    GameState {
        player: Player {
            x: ARENA_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
            y: ARENA_HEIGHT - PLAYER_SIZE - 10.0,
        },
        lasers: Vec::new(),
        monsters: Vec::new(),
        boss: BossEncounter::NotYet,
        score: 0,
        laser_cooldown: 0,
        status: GameStatus::Playing,
        frame: 0,
        events: Vec::new(),
    }
}

/// Place a fresh boss somewhere in the left quarter of the arena.
pub fn spawn_boss(rng: &mut impl Rng) -> Boss {
    let x = rng.gen_range(0.0..ARENA_WIDTH / 4.0);
    let y = ARENA_HEIGHT / 4.0 - BOSS_SIZE / 2.0;
    Boss {
        x,
        y,
        health: BOSS_MAX_HEALTH,
        phase: BossPhase::Active,
        origin: (x, y),
        target: (ARENA_WIDTH - BOSS_SIZE, BOSS_SIZE),
        leg_tick: 0,
        heading: Heading::Outbound,
    }
}

// ── Input-driven transitions (pure) ──────────────────────────────────────────

/// Apply held direction flags and clamp the player inside the arena.
pub fn move_player(player: &Player, input: &Input) -> Player {
    let mut dx = 0.0;
    let mut dy = 0.0;
    if input.up {
        dy -= PLAYER_SPEED;
    }
    if input.down {
        dy += PLAYER_SPEED;
    }
    if input.left {
        dx -= PLAYER_SPEED;
    }
    if input.right {
        dx += PLAYER_SPEED;
    }
    Player {
        x: (player.x + dx).clamp(0.0, ARENA_WIDTH - PLAYER_SIZE),
        y: (player.y + dy).clamp(0.0, ARENA_HEIGHT - PLAYER_SIZE),
    }
}

/// A laser leaving the horizontal centre of the player's sprite.
pub fn laser_from(player: &Player) -> Laser {
    Laser {
        x: player.x + PLAYER_SIZE / 2.0 - LASER_WIDTH / 2.0,
        y: player.y,
    }
}

/// Move the boss one tick along its back-and-forth patrol line.
pub fn advance_patrol(boss: &Boss) -> Boss {
    let (from, to) = match boss.heading {
        Heading::Outbound => (boss.origin, boss.target),
        Heading::Return => (boss.target, boss.origin),
    };
    let leg_tick = boss.leg_tick + 1;
    let t = leg_tick as f32 / BOSS_LEG_TICKS as f32;
    let x = from.0 + (to.0 - from.0) * t;
    let y = from.1 + (to.1 - from.1) * t;

    let (leg_tick, heading) = if leg_tick >= BOSS_LEG_TICKS {
        let flipped = match boss.heading {
            Heading::Outbound => Heading::Return,
            Heading::Return => Heading::Outbound,
        };
        (0, flipped)
    } else {
        (leg_tick, boss.heading)
    };

    Boss {
        x,
        y,
        leg_tick,
        heading,
        ..boss.clone()
    }
}

// ── Boss update ──────────────────────────────────────────────────────────────

enum BossOutcome {
    Alive(Boss),
    Defeated,
    HitPlayer(Boss),
}

/// Advance the boss by one tick.  Lasers that hit it are removed from
/// `lasers`; events are appended to `events`.
fn update_boss(
    boss: &Boss,
    player: &Player,
    lasers: &mut Vec<Laser>,
    events: &mut Vec<FrameEvent>,
) -> BossOutcome {
    let mut phase = boss.phase.clone();
    if let BossPhase::Phase2 { defeat_in } = phase {
        let defeat_in = defeat_in.saturating_sub(1);
        if defeat_in == 0 {
            return BossOutcome::Defeated;
        }
        phase = BossPhase::Phase2 { defeat_in };
    }

    let mut boss = Boss {
        phase,
        ..advance_patrol(boss)
    };

    if boss.bounds().intersects(&player.bounds()) {
        return BossOutcome::HitPlayer(boss);
    }

    let bounds = boss.bounds();
    let before = lasers.len();
    lasers.retain(|l| !bounds.intersects(&l.bounds()));
    let hits = before - lasers.len();

    for _ in 0..hits {
        boss.health = boss.health.saturating_sub(1);
        events.push(FrameEvent::BossHit {
            health: boss.health,
        });
        if boss.health == 0 && boss.phase == BossPhase::Active {
            boss.phase = BossPhase::Phase2 {
                defeat_in: BOSS_DEFEAT_DELAY_TICKS,
            };
            boss.health = BOSS_PHASE2_HEALTH;
            events.push(FrameEvent::BossPhase2);
        }
    }

    BossOutcome::Alive(boss)
}

// ── Per-frame tick (nearly pure, RNG is injected) ────────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (tests use a seeded or stepped RNG).
///
/// A state that is already over is returned unchanged.
pub fn tick(state: &GameState, input: &Input, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return state.clone();
    }
    let frame = state.frame + 1;
    let mut events = Vec::new();

    // ── 1. Player movement ───────────────────────────────────────────────────
    let player = move_player(&state.player, input);

    // ── 2–3. Firing & cooldown ───────────────────────────────────────────────
    let mut lasers = state.lasers.clone();
    let mut laser_cooldown = state.laser_cooldown;
    if input.fire && laser_cooldown == 0 {
        lasers.push(laser_from(&player));
        laser_cooldown = LASER_COOLDOWN;
    }
    laser_cooldown = laser_cooldown.saturating_sub(1);

    // ── 4. Lasers travel up and vanish past the top ──────────────────────────
    let mut lasers: Vec<Laser> = lasers
        .into_iter()
        .map(|l| Laser {
            y: l.y - LASER_SPEED,
            ..l
        })
        .filter(|l| l.y >= 0.0)
        .collect();

    // ── 5. Monsters fall ─────────────────────────────────────────────────────
    let fallen: Vec<Monster> = state
        .monsters
        .iter()
        .map(|m| Monster {
            y: m.y + MONSTER_SPEED,
            ..m.clone()
        })
        .collect();

    let over = |monsters: Vec<Monster>,
                lasers: Vec<Laser>,
                boss: BossEncounter,
                mut events: Vec<FrameEvent>| {
        events.push(FrameEvent::GameOver);
        GameState {
            player: player.clone(),
            lasers,
            monsters,
            boss,
            laser_cooldown,
            status: GameStatus::GameOver,
            frame,
            events,
            ..state.clone()
        }
    };

    // ── 6. Monster touching the player ends the session ──────────────────────
    let player_box = player.bounds();
    if fallen.iter().any(|m| m.bounds().intersects(&player_box)) {
        return over(fallen, lasers, state.boss.clone(), events);
    }

    // ── 7. Lasers ↔ monsters: first laser found consumes the monster ─────────
    let mut score = state.score;
    let mut monsters = Vec::with_capacity(fallen.len() + 1);
    for monster in fallen {
        let bounds = monster.bounds();
        match lasers.iter().position(|l| bounds.intersects(&l.bounds())) {
            Some(i) => {
                lasers.remove(i);
                score += 1;
                events.push(FrameEvent::MonsterKilled);
            }
            None => monsters.push(monster),
        }
    }
    monsters.retain(|m| m.y < ARENA_HEIGHT);

    // ── 8. Spawn ─────────────────────────────────────────────────────────────
    if rng.gen_bool(MONSTER_SPAWN_CHANCE) {
        let x = rng.gen_range(0.0..ARENA_WIDTH - MONSTER_SIZE);
        monsters.push(Monster { x, y: 0.0 });
    }

    // ── 9. Boss arrival ──────────────────────────────────────────────────────
    let mut boss = state.boss.clone();
    if score >= BOSS_TRIGGER_SCORE && boss == BossEncounter::NotYet {
        boss = BossEncounter::Engaged(spawn_boss(rng));
        events.push(FrameEvent::BossSpawned);
    }

    // ── 10. Boss fight ───────────────────────────────────────────────────────
    if let BossEncounter::Engaged(current) = &boss {
        boss = match update_boss(current, &player, &mut lasers, &mut events) {
            BossOutcome::Alive(next) => BossEncounter::Engaged(next),
            BossOutcome::Defeated => {
                score += BOSS_BONUS;
                events.push(FrameEvent::BossDefeated { bonus: BOSS_BONUS });
                BossEncounter::Done
            }
            BossOutcome::HitPlayer(next) => {
                let mut ended = over(monsters, lasers, BossEncounter::Engaged(next), events);
                ended.score = score;
                return ended;
            }
        };
    }

    GameState {
        player,
        lasers,
        monsters,
        boss,
        score,
        laser_cooldown,
        status: GameStatus::Playing,
        frame,
        events,
    }
}
