//! Rendering layer.  All terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! state to draw.  No game or fleet logic is performed; this module only
//! translates state into terminal commands.

pub mod screens;

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use drone_console::entities::{
    Boss, GameState, GameStatus, Laser, Monster, ARENA_HEIGHT, ARENA_WIDTH, BOSS_SIZE,
    MONSTER_SIZE, PLAYER_SIZE,
};
use drone_console::session::Verdict;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_BOSS_BAR: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_MONSTER: Color = Color::Green;
const C_BOSS: Color = Color::Red;
const C_BOSS_BROKEN: Color = Color::DarkGrey;
const C_LASER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

const BOSS_BAR_CELLS: u16 = 20;

// ── Arena → terminal mapping ─────────────────────────────────────────────────

/// Maps arena coordinates onto the cells inside the border
/// (rows 2 .. height-2, columns 1 .. width-1).
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    fn inner_cols(&self) -> f32 {
        self.width.saturating_sub(2).max(1) as f32
    }

    fn inner_rows(&self) -> f32 {
        self.height.saturating_sub(4).max(1) as f32
    }

    fn col(&self, x: f32) -> u16 {
        let inner = self.inner_cols();
        1 + (x / ARENA_WIDTH * inner).floor().clamp(0.0, inner - 1.0) as u16
    }

    fn row(&self, y: f32) -> u16 {
        let inner = self.inner_rows();
        2 + (y / ARENA_HEIGHT * inner).floor().clamp(0.0, inner - 1.0) as u16
    }

    fn cols_for(&self, w: f32) -> u16 {
        ((w / ARENA_WIDTH * self.inner_cols()).round() as u16).max(1)
    }

    fn rows_for(&self, h: f32) -> u16 {
        ((h / ARENA_HEIGHT * self.inner_rows()).round() as u16).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete game frame.  `verdict` is set once the game is over.
pub fn render_game<W: Write>(
    out: &mut W,
    view: Viewport,
    state: &GameState,
    high_score: u32,
    verdict: Option<&Verdict>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view, state, high_score)?;

    if let Some(boss) = state.active_boss() {
        draw_boss(out, view, boss)?;
    }
    for monster in &state.monsters {
        draw_monster(out, view, monster)?;
    }
    for laser in &state.lasers {
        draw_laser(out, view, laser)?;
    }
    draw_player(out, view, state)?;
    draw_controls_hint(out, view)?;

    if state.status == GameStatus::GameOver {
        if let Some(verdict) = verdict {
            draw_game_over(out, view, verdict)?;
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

pub(crate) fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(
    out: &mut W,
    view: Viewport,
    state: &GameState,
    high_score: u32,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if high_score > 0 {
        out.queue(Print(format!("Score:{:>5}  Hi:{:>5}", state.score, high_score)))?;
    } else {
        out.queue(Print(format!("Score:{:>5}", state.score)))?;
    }

    // Boss health bar, centred, only while a boss is on screen
    if state.active_boss().is_some() {
        let filled = (state.boss_health_fraction() * BOSS_BAR_CELLS as f32).round() as usize;
        let bar = format!(
            "BOSS [{}{}]",
            "█".repeat(filled),
            " ".repeat(BOSS_BAR_CELLS as usize - filled.min(BOSS_BAR_CELLS as usize))
        );
        let bx = (view.width / 2).saturating_sub(bar.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(bx, 0))?;
        out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
        out.queue(Print(bar))?;
    }

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: Viewport, state: &GameState) -> std::io::Result<()> {
    // Drone sprite, centred on the player's box:
    //   ╶▲╴
    //   ╱█╲
    let p = &state.player;
    let cx = view.col(p.x + PLAYER_SIZE / 2.0);
    let top = view.row(p.y);
    let bottom = view.row(p.y + PLAYER_SIZE - 1.0);
    out.queue(style::SetForegroundColor(C_PLAYER))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), top))?;
    out.queue(Print("╶▲╴"))?;
    if bottom > top {
        out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), bottom))?;
        out.queue(Print("╱█╲"))?;
    }
    Ok(())
}

fn draw_monster<W: Write>(out: &mut W, view: Viewport, monster: &Monster) -> std::io::Result<()> {
    let cx = view.col(monster.x + MONSTER_SIZE / 2.0);
    out.queue(style::SetForegroundColor(C_MONSTER))?;
    out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), view.row(monster.y)))?;
    out.queue(Print("(◎)"))?;
    Ok(())
}

fn draw_laser<W: Write>(out: &mut W, view: Viewport, laser: &Laser) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(view.col(laser.x), view.row(laser.y)))?;
    out.queue(style::SetForegroundColor(C_LASER))?;
    out.queue(Print("║"))?;
    Ok(())
}

fn draw_boss<W: Write>(out: &mut W, view: Viewport, boss: &Boss) -> std::io::Result<()> {
    let (color, fill) = if boss.is_defeated_sprite() {
        (C_BOSS_BROKEN, "░")
    } else {
        (C_BOSS, "▓")
    };
    let left = view.col(boss.x);
    let top = view.row(boss.y);
    let cols = view.cols_for(BOSS_SIZE);
    let rows = view.rows_for(BOSS_SIZE);
    let line = fill.repeat(cols as usize);

    out.queue(style::SetForegroundColor(color))?;
    for r in 0..rows {
        let row = top + r;
        if row >= view.height.saturating_sub(2) {
            break;
        }
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ ← → / W A S D : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, view: Viewport, verdict: &Verdict) -> std::io::Result<()> {
    let score_line = format!("Score: {:>6}", verdict.score);
    let best_line = if verdict.new_best {
        format!("★ NEW HIGH SCORE: {:>6} ★", verdict.high_score)
    } else {
        format!("High Score: {:>6}", verdict.high_score)
    };
    let rookie_line = if verdict.rookie {
        format!("Rookie run! Score: {}", verdict.score)
    } else {
        String::new()
    };

    let lines: Vec<(String, Color)> = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (score_line, Color::Yellow),
        (best_line, Color::Yellow),
        (rookie_line, Color::Magenta),
        ("R - Repeat   M - Menu   Q - Quit".to_string(), Color::White),
    ];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        if msg.is_empty() {
            continue;
        }
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
