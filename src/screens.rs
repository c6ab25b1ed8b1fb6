//! Login form and the fleet screens: state, key handling and the
//! background-fetch plumbing.  Drawing lives in `display::screens`.

use std::io::Write;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::{error, info, warn};

use drone_console::api::{CatalogueRow, DataSource, DroneApi, DroneTypeRecord};
use drone_console::auth::CredentialTable;
use drone_console::error::FleetError;
use drone_console::fleet::{
    self, catalogue_page, load_drone_types, load_dynamics, search_window, spawn_fetch,
    DroneFilter, DynamicsCache, FetchGeneration, Fetched, HistoryStore, Pager, DRONE_NUMBERS,
};

use crate::display::{self, Viewport};

/// Fleet screens redraw at a relaxed pace; they only wait on keys and workers.
const SCREEN_FRAME: Duration = Duration::from_millis(50);

/// Where a screen hands control back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Back,
    Quit,
}

/// Shared handles every fleet screen needs.
pub struct FleetContext<S> {
    pub api: Arc<DroneApi<S>>,
    pub store: HistoryStore,
    pub page_size: usize,
}

fn viewport() -> std::io::Result<Viewport> {
    let (width, height) = terminal::size()?;
    Ok(Viewport { width, height })
}

/// Key presses only; repeats and releases are ignored outside the game.
fn pressed(rx: &Receiver<Event>) -> Vec<KeyEvent> {
    let mut keys = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                keys.push(key);
            }
        }
    }
    keys
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn pace(frame_start: Instant) {
    let elapsed = frame_start.elapsed();
    if elapsed < SCREEN_FRAME {
        thread::sleep(SCREEN_FRAME - elapsed);
    }
}

/// Log the full error and turn it into the one-line alert the user sees.
fn alert_for(err: &FleetError) -> String {
    error!(error = %err, "fleet request failed");
    format!("{}: {}", err.alert_title(), err.alert_message())
}

// ── Login ─────────────────────────────────────────────────────────────────────

pub const LOGIN_FIELDS: [&str; 3] = ["Group", "Username", "Password"];

#[derive(Debug, Default)]
pub struct LoginForm {
    pub values: [String; 3],
    pub focus: usize,
    pub message: Option<String>,
}

/// Returns `true` once the user is authenticated, `false` if they gave up.
pub fn login<W: Write>(
    out: &mut W,
    rx: &Receiver<Event>,
    credentials: &CredentialTable,
) -> std::io::Result<bool> {
    let mut form = LoginForm::default();
    loop {
        let frame_start = Instant::now();
        for key in pressed(rx) {
            match key.code {
                KeyCode::Esc => return Ok(false),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(false)
                }
                KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % 3,
                KeyCode::BackTab | KeyCode::Up => form.focus = (form.focus + 2) % 3,
                KeyCode::Backspace => {
                    form.values[form.focus].pop();
                }
                KeyCode::Char(c) => form.values[form.focus].push(c),
                KeyCode::Enter if form.focus < 2 => form.focus += 1,
                KeyCode::Enter => {
                    let [group, user, pass] = &form.values;
                    if credentials.validate(group, user, pass) {
                        info!(group = %group, user = %user, "login accepted");
                        return Ok(true);
                    }
                    warn!(group = %group, user = %user, "login rejected");
                    form.message = Some("Invalid credentials, please try again.".to_string());
                    form.values[2].clear();
                    form.focus = 2;
                }
                _ => {}
            }
        }
        display::screens::render_login(out, viewport()?, &form)?;
        pace(frame_start);
    }
}

// ── Drone dynamics ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DynamicsScreen {
    pub drone: u32,
    pub pager: Pager,
    pub cache: DynamicsCache,
    pub selected: Option<usize>,
    pub loading: bool,
    pub alert: Option<String>,
    /// Row number being typed after pressing `g`.
    pub jump: Option<String>,
}

impl DynamicsScreen {
    fn new(page_size: usize) -> Self {
        Self {
            drone: *DRONE_NUMBERS.start(),
            pager: Pager::new(page_size, fleet::DYNAMICS_MAX_OFFSET),
            cache: DynamicsCache::new(),
            selected: None,
            loading: false,
            alert: None,
            jump: None,
        }
    }

    fn move_selection(&mut self, down: bool) {
        let ids: Vec<usize> = self.cache.ids().collect();
        let Some(current) = self.selected.and_then(|s| ids.iter().position(|&id| id == s)) else {
            self.selected = ids.first().copied();
            return;
        };
        let next = if down {
            (current + 1).min(ids.len().saturating_sub(1))
        } else {
            current.saturating_sub(1)
        };
        self.selected = ids.get(next).copied();
    }
}

fn request_dynamics<S: DataSource + 'static>(
    screen: &mut DynamicsScreen,
    ctx: &FleetContext<S>,
    generation: &FetchGeneration,
    tx: &Sender<Fetched<DynamicsCache>>,
) {
    screen.cache.clear();
    screen.selected = None;
    screen.loading = true;
    screen.alert = None;

    let api = Arc::clone(&ctx.api);
    let store = ctx.store.clone();
    let (drone, limit, offset) = (screen.drone, screen.pager.limit(), screen.pager.offset());
    spawn_fetch(generation.begin(), tx.clone(), move |ticket| {
        load_dynamics(&api, &store, drone, limit, offset, ticket)
    });
}

pub fn dynamics<W: Write, S: DataSource + 'static>(
    out: &mut W,
    rx: &Receiver<Event>,
    ctx: &FleetContext<S>,
) -> std::io::Result<Flow> {
    let mut screen = DynamicsScreen::new(ctx.page_size);
    let generation = FetchGeneration::new();
    let (tx, results) = mpsc::channel::<Fetched<DynamicsCache>>();
    request_dynamics(&mut screen, ctx, &generation, &tx);

    loop {
        let frame_start = Instant::now();

        for key in pressed(rx) {
            if let Some(buffer) = screen.jump.as_mut() {
                match key.code {
                    KeyCode::Char(c) if c.is_ascii_digit() => buffer.push(c),
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Esc => screen.jump = None,
                    KeyCode::Enter => {
                        let row = buffer.parse::<usize>().unwrap_or(0);
                        screen.jump = None;
                        match screen.pager.jump_to_row(row) {
                            Ok(_) => request_dynamics(&mut screen, ctx, &generation, &tx),
                            Err(e) => screen.alert = Some(format!("Error: {e}")),
                        }
                    }
                    _ => {}
                }
                continue;
            }

            if is_quit(&key) {
                return Ok(Flow::Quit);
            }
            let moved = match key.code {
                KeyCode::Esc => return Ok(Flow::Back),
                KeyCode::Char('n') => Some(screen.pager.next()),
                KeyCode::Char('p') => Some(screen.pager.previous()),
                KeyCode::Char('l') => Some(screen.pager.last()),
                KeyCode::Char('r') => Some(Ok(screen.pager.offset())),
                KeyCode::Char('g') => {
                    screen.jump = Some(String::new());
                    None
                }
                KeyCode::Char('+') | KeyCode::Char('-') => {
                    let step_up = key.code == KeyCode::Char('+');
                    let next = if step_up {
                        screen.drone + 1
                    } else {
                        screen.drone.saturating_sub(1)
                    };
                    if DRONE_NUMBERS.contains(&next) {
                        screen.drone = next;
                        screen.pager.reset();
                        Some(Ok(0))
                    } else {
                        None
                    }
                }
                KeyCode::Up => {
                    screen.move_selection(false);
                    None
                }
                KeyCode::Down => {
                    screen.move_selection(true);
                    None
                }
                _ => None,
            };
            match moved {
                Some(Ok(_)) => request_dynamics(&mut screen, ctx, &generation, &tx),
                Some(Err(e)) => {
                    warn!(error = %e, "page navigation refused");
                    screen.alert = Some(format!("Error: {e}"));
                }
                None => {}
            }
        }

        while let Ok(fetched) = results.try_recv() {
            match fetched.accept() {
                Some(Ok(cache)) => {
                    screen.loading = false;
                    screen.selected = cache.first().map(|(id, _)| id);
                    screen.cache = cache;
                }
                Some(Err(e)) => {
                    screen.loading = false;
                    screen.alert = Some(alert_for(&e));
                }
                None => {}
            }
        }

        display::screens::render_dynamics(out, viewport()?, &screen)?;
        pace(frame_start);
    }
}

// ── Drone list (history) ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterField {
    Manufacturer,
    Typename,
}

#[derive(Debug)]
pub struct DronesScreen {
    pub pager: Pager,
    pub rows: Vec<CatalogueRow>,
    pub filter: DroneFilter,
    pub editing: Option<(FilterField, String)>,
    pub loading: bool,
    pub alert: Option<String>,
}

fn request_drones<S: DataSource + 'static>(
    screen: &mut DronesScreen,
    ctx: &FleetContext<S>,
    generation: &FetchGeneration,
    tx: &Sender<Fetched<Vec<CatalogueRow>>>,
) {
    screen.rows.clear();
    screen.loading = true;
    screen.alert = None;

    let api = Arc::clone(&ctx.api);
    let filter = screen.filter.clone();
    let (limit, offset) = search_window(&screen.pager, &filter);
    spawn_fetch(generation.begin(), tx.clone(), move |ticket| {
        catalogue_page(&api, limit, offset, &filter, ticket)
    });
}

pub fn drones<W: Write, S: DataSource + 'static>(
    out: &mut W,
    rx: &Receiver<Event>,
    ctx: &FleetContext<S>,
) -> std::io::Result<Flow> {
    let mut screen = DronesScreen {
        pager: Pager::new(ctx.page_size, fleet::DRONES_MAX_OFFSET),
        rows: Vec::new(),
        filter: DroneFilter::default(),
        editing: None,
        loading: false,
        alert: None,
    };
    let generation = FetchGeneration::new();
    let (tx, results) = mpsc::channel::<Fetched<Vec<CatalogueRow>>>();
    request_drones(&mut screen, ctx, &generation, &tx);

    loop {
        let frame_start = Instant::now();

        for key in pressed(rx) {
            if let Some((field, draft)) = screen.editing.as_mut() {
                match key.code {
                    KeyCode::Char(c) => draft.push(c),
                    KeyCode::Backspace => {
                        draft.pop();
                    }
                    KeyCode::Esc => screen.editing = None,
                    KeyCode::Enter => {
                        screen.filter = match field {
                            FilterField::Manufacturer => {
                                DroneFilter::new(draft, &screen.filter.typename)
                            }
                            FilterField::Typename => {
                                DroneFilter::new(&screen.filter.manufacturer, draft)
                            }
                        };
                        screen.editing = None;
                        screen.pager.reset();
                        request_drones(&mut screen, ctx, &generation, &tx);
                    }
                    _ => {}
                }
                continue;
            }

            if is_quit(&key) {
                return Ok(Flow::Quit);
            }
            let moved = match key.code {
                KeyCode::Esc => return Ok(Flow::Back),
                KeyCode::Char('n') => Some(screen.pager.next()),
                KeyCode::Char('p') => Some(screen.pager.previous()),
                KeyCode::Char('l') => Some(screen.pager.last()),
                KeyCode::Char('r') => Some(Ok(screen.pager.offset())),
                KeyCode::Char('m') => {
                    screen.editing =
                        Some((FilterField::Manufacturer, screen.filter.manufacturer.clone()));
                    None
                }
                KeyCode::Char('t') => {
                    screen.editing = Some((FilterField::Typename, screen.filter.typename.clone()));
                    None
                }
                KeyCode::Char('c') => {
                    screen.filter = DroneFilter::default();
                    Some(Ok(screen.pager.offset()))
                }
                _ => None,
            };
            match moved {
                Some(Ok(_)) => request_drones(&mut screen, ctx, &generation, &tx),
                Some(Err(e)) => {
                    warn!(error = %e, "page navigation refused");
                    screen.alert = Some(format!("Error: {e}"));
                }
                None => {}
            }
        }

        while let Ok(fetched) = results.try_recv() {
            match fetched.accept() {
                Some(Ok(rows)) => {
                    screen.loading = false;
                    screen.rows = rows;
                }
                Some(Err(e)) => {
                    screen.loading = false;
                    screen.alert = Some(alert_for(&e));
                }
                None => {}
            }
        }

        display::screens::render_drones(out, viewport()?, &screen)?;
        pace(frame_start);
    }
}

// ── Drone types catalogue ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct TypesScreen {
    pub types: Vec<DroneTypeRecord>,
    pub loading: bool,
    pub alert: Option<String>,
}

pub fn drone_types<W: Write, S: DataSource + 'static>(
    out: &mut W,
    rx: &Receiver<Event>,
    ctx: &FleetContext<S>,
) -> std::io::Result<Flow> {
    let mut screen = TypesScreen::default();
    let generation = FetchGeneration::new();
    let (tx, results) = mpsc::channel::<Fetched<Vec<DroneTypeRecord>>>();

    let request = |screen: &mut TypesScreen| {
        screen.loading = true;
        screen.alert = None;
        let api = Arc::clone(&ctx.api);
        spawn_fetch(generation.begin(), tx.clone(), move |_| load_drone_types(&api));
    };
    request(&mut screen);

    loop {
        let frame_start = Instant::now();

        for key in pressed(rx) {
            if is_quit(&key) {
                return Ok(Flow::Quit);
            }
            match key.code {
                KeyCode::Esc => return Ok(Flow::Back),
                KeyCode::Char('r') => request(&mut screen),
                _ => {}
            }
        }

        while let Ok(fetched) = results.try_recv() {
            match fetched.accept() {
                Some(Ok(types)) => {
                    screen.loading = false;
                    screen.types = types;
                }
                Some(Err(e)) => {
                    screen.loading = false;
                    screen.alert = Some(alert_for(&e));
                }
                None => {}
            }
        }

        display::screens::render_types(out, viewport()?, &screen)?;
        pace(frame_start);
    }
}
