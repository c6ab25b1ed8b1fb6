mod display;
mod screens;

use std::cell::Cell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{stdout, BufWriter, Write};
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drone_console::api::{DataSource, DroneApi, HttpSource};
use drone_console::auth::CredentialTable;
use drone_console::compute::TICKS_PER_SECOND;
use drone_console::config::Config;
use drone_console::entities::Input;
use drone_console::fleet::HistoryStore;
use drone_console::session::{Scoreboard, Session, Verdict};

use crate::display::Viewport;
use crate::screens::{FleetContext, Flow};

const FRAME: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// 8 frames at 60 ticks/s is ≈133 ms, shorter than any OS repeat interval.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Input {
    use KeyCode::{Char, Down, Left, Right, Up};
    Input {
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        fire: is_held(key_frame, &Char(' '), frame),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Dynamics,
    Drones,
    Types,
    Game,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "✈  DRONE  CONSOLE  ✈";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if high_score > 0 {
        let hs_str = format!("Best Score: {}", high_score);
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hs_str.chars().count() as u16 / 2),
            cy.saturating_sub(5),
        ))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Dynamics", Color::Green, "live telemetry, page by page"),
        ("2", "Drones  ", Color::Green, "drone history with search"),
        ("3", "Types   ", Color::Green, "drone type catalogue"),
        ("4", "Game    ", Color::Magenta, "shoot the monsters, beat the boss"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(18), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(label))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("  {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(18), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event
        {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Dynamics),
                KeyCode::Char('2') => return Ok(MenuResult::Drones),
                KeyCode::Char('3') => return Ok(MenuResult::Types),
                KeyCode::Char('4') => return Ok(MenuResult::Game),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the still-fresh keys are
/// folded into one `Input`, so moving and firing can be held together.
/// Keyboard-enhancement terminals also send `Release`, which drops the key
/// immediately; classic terminals rely on `HOLD_WINDOW` expiry.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    scoreboard: &mut Scoreboard,
) -> std::io::Result<bool> {
    let finished: Rc<Cell<Option<u32>>> = Rc::new(Cell::new(None));
    let sink = Rc::clone(&finished);
    let mut session = Session::new(thread_rng(), move |score| sink.set(Some(score)));
    let mut verdict: Option<Verdict> = None;

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(true);
                        }
                        KeyCode::Esc => return Ok(false),
                        KeyCode::Char('m') | KeyCode::Char('M') if session.is_over() => {
                            return Ok(false);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if session.is_over() => {
                            session.restart();
                            verdict = None;
                            key_frame.clear();
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let input = held_input(&key_frame, frame);
        session.tick(&input);

        if let Some(score) = finished.take() {
            verdict = Some(scoreboard.record(score));
        }

        let (width, height) = terminal::size()?;
        display::render_game(
            out,
            Viewport { width, height },
            session.state(),
            scoreboard.high_score(),
            verdict.as_ref(),
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// The terminal is in raw mode, so logs go to a file under the data dir.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    let path = config.log_path();
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config)?;
    info!(host = %config.host, data_dir = %config.data_dir.display(), "starting");

    let source = HttpSource::new(&config.host, &config.user_agent, config.timeout())
        .context("building HTTP client")?;
    let ctx = FleetContext {
        api: Arc::new(DroneApi::new(source)),
        store: HistoryStore::new(config.data_dir.clone()),
        page_size: config.page_size,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so no screen ever blocks on terminal I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                warn!(error = %e, "terminal event read failed");
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &ctx, &CredentialTable::builtin());

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result.context("terminal session failed")
}

fn run<W: Write, S: DataSource + 'static>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    ctx: &FleetContext<S>,
    credentials: &CredentialTable,
) -> std::io::Result<()> {
    if !screens::login(out, rx, credentials)? {
        return Ok(());
    }

    let mut scoreboard = Scoreboard::new();
    loop {
        let flow = match show_menu(out, rx, scoreboard.high_score())? {
            MenuResult::Quit => break,
            MenuResult::Dynamics => screens::dynamics(out, rx, ctx)?,
            MenuResult::Drones => screens::drones(out, rx, ctx)?,
            MenuResult::Types => screens::drone_types(out, rx, ctx)?,
            MenuResult::Game => {
                if game_loop(out, rx, &mut scoreboard)? {
                    Flow::Quit
                } else {
                    Flow::Back
                }
            }
        };
        if flow == Flow::Quit {
            break;
        }
    }
    Ok(())
}
