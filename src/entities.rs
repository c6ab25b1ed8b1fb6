//! All minigame entity types: pure data, no logic beyond geometry.

// ── Arena & sprite dimensions ────────────────────────────────────────────────

pub const ARENA_WIDTH: f32 = 800.0;
pub const ARENA_HEIGHT: f32 = 600.0;

pub const PLAYER_SIZE: f32 = 100.0;
pub const MONSTER_SIZE: f32 = 50.0;
pub const BOSS_SIZE: f32 = 200.0;
pub const LASER_WIDTH: f32 = 4.0;
pub const LASER_HEIGHT: f32 = 10.0;

/// Boss health on spawn and the upper bound it may never exceed.
pub const BOSS_MAX_HEALTH: u32 = 20;

/// Health the boss is given when it enters its second phase.
pub const BOSS_PHASE2_HEALTH: u32 = 4;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in arena coordinates (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Overlap test.  Touching edges count as an intersection.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }
}

// ── Player & projectiles ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

/// A laser fired by the player.  Always travels straight up.
#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    pub x: f32,
    pub y: f32,
}

impl Laser {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, LASER_WIDTH, LASER_HEIGHT)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Monster {
    pub x: f32,
    pub y: f32,
}

impl Monster {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, MONSTER_SIZE, MONSTER_SIZE)
    }
}

// ── Boss ─────────────────────────────────────────────────────────────────────

/// Which way the boss is currently travelling along its patrol line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Heading {
    /// From the spawn point towards the far corner.
    Outbound,
    /// From the far corner back to the spawn point.
    Return,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BossPhase {
    /// Full fight; health counts down from `BOSS_MAX_HEALTH`.
    Active,
    /// Health was depleted once.  The boss shows its defeated sprite and is
    /// removed once `defeat_in` reaches zero.
    Phase2 { defeat_in: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    /// Always within `0..=BOSS_MAX_HEALTH`.
    pub health: u32,
    pub phase: BossPhase,
    /// Patrol endpoints: the spawn point and the far corner.
    pub origin: (f32, f32),
    pub target: (f32, f32),
    /// Ticks elapsed on the current leg of the patrol.
    pub leg_tick: u32,
    pub heading: Heading,
}

impl Boss {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, BOSS_SIZE, BOSS_SIZE)
    }

    /// Fraction of the health bar to fill, in `0.0..=1.0`.
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / BOSS_MAX_HEALTH as f32
    }

    pub fn is_defeated_sprite(&self) -> bool {
        matches!(self.phase, BossPhase::Phase2 { .. })
    }
}

/// Lifecycle of the single boss a session may meet.
#[derive(Clone, Debug, PartialEq)]
pub enum BossEncounter {
    NotYet,
    Engaged(Boss),
    Done,
}

// ── Status & stages ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Coarse state-machine view of a session, derived from `GameState`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    Running,
    BossPending,
    BossActive,
    BossPhase2,
    BossDefeated,
    GameOver,
}

/// Something notable that happened during the most recent tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    MonsterKilled,
    BossSpawned,
    BossHit { health: u32 },
    BossPhase2,
    BossDefeated { bonus: u32 },
    GameOver,
}

/// Held input flags for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Input {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire minigame state.  Cloneable so the pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub lasers: Vec<Laser>,
    pub monsters: Vec<Monster>,
    pub boss: BossEncounter,
    pub score: u32,
    /// Ticks until the next laser may be fired.
    pub laser_cooldown: u32,
    pub status: GameStatus,
    pub frame: u64,
    /// Events raised by the last tick only.
    pub events: Vec<FrameEvent>,
}

impl GameState {
    pub fn stage(&self) -> Stage {
        if self.status == GameStatus::GameOver {
            return Stage::GameOver;
        }
        match &self.boss {
            BossEncounter::NotYet if self.score >= 2 => Stage::BossPending,
            BossEncounter::NotYet => Stage::Running,
            BossEncounter::Engaged(boss) => match boss.phase {
                BossPhase::Active => Stage::BossActive,
                BossPhase::Phase2 { .. } => Stage::BossPhase2,
            },
            BossEncounter::Done if self.just_defeated_boss() => Stage::BossDefeated,
            BossEncounter::Done => Stage::Running,
        }
    }

    fn just_defeated_boss(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, FrameEvent::BossDefeated { .. }))
    }

    pub fn active_boss(&self) -> Option<&Boss> {
        match &self.boss {
            BossEncounter::Engaged(boss) => Some(boss),
            _ => None,
        }
    }

    /// Health-bar fill for the HUD; empty when no boss is on screen.
    pub fn boss_health_fraction(&self) -> f32 {
        self.active_boss().map_or(0.0, Boss::health_fraction)
    }
}
