//! Drawing for the login form and the fleet screens.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use drone_console::api::format_timestamp;

use super::{draw_border, Viewport};
use crate::screens::{
    DronesScreen, DynamicsScreen, FilterField, LoginForm, TypesScreen, LOGIN_FIELDS,
};

const C_TITLE: Color = Color::Cyan;
const C_LABEL: Color = Color::DarkGrey;
const C_VALUE: Color = Color::White;
const C_SELECTED: Color = Color::Yellow;
const C_ALERT: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

// ── Shared pieces ─────────────────────────────────────────────────────────────

fn begin<W: Write>(out: &mut W, view: Viewport, title: &str) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, view)?;
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(title))?;
    Ok(())
}

fn text_at<W: Write>(out: &mut W, col: u16, row: u16, color: Color, text: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Status line (row height-3), then the key hint on the last row.
fn finish<W: Write>(
    out: &mut W,
    view: Viewport,
    loading: bool,
    alert: Option<&str>,
    hint: &str,
) -> std::io::Result<()> {
    let status_row = view.height.saturating_sub(3);
    if let Some(alert) = alert {
        text_at(out, 2, status_row, C_ALERT, alert)?;
    } else if loading {
        text_at(out, 2, status_row, C_SELECTED, "Loading…")?;
    }
    text_at(out, 1, view.height.saturating_sub(1), C_HINT, hint)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        format!("{text:<width$}")
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ── Login ─────────────────────────────────────────────────────────────────────

pub fn render_login<W: Write>(out: &mut W, view: Viewport, form: &LoginForm) -> std::io::Result<()> {
    begin(out, view, "DRONE CONSOLE — Login")?;

    let col = (view.width / 2).saturating_sub(20);
    let top = (view.height / 2).saturating_sub(3);
    for (i, label) in LOGIN_FIELDS.iter().enumerate() {
        let row = top + i as u16 * 2;
        let shown = if i == 2 {
            "*".repeat(form.values[i].chars().count())
        } else {
            form.values[i].clone()
        };
        let color = if form.focus == i { C_SELECTED } else { C_VALUE };
        text_at(out, col, row, C_LABEL, &format!("{label:>9}: "))?;
        text_at(out, col + 11, row, color, &format!("{shown}_"))?;
    }

    finish(
        out,
        view,
        false,
        form.message.as_deref(),
        "TAB / ↑ ↓ : Field   ENTER : Next / Login   ESC : Quit",
    )
}

// ── Drone dynamics ────────────────────────────────────────────────────────────

pub fn render_dynamics<W: Write>(
    out: &mut W,
    view: Viewport,
    screen: &DynamicsScreen,
) -> std::io::Result<()> {
    begin(
        out,
        view,
        &format!(
            "Drone Dynamics — drone #{}   offset {}",
            screen.drone,
            screen.pager.offset()
        ),
    )?;

    // Left column: synthetic ids of the current page
    let mut row = 3;
    for id in screen.cache.ids() {
        let marker = if screen.selected == Some(id) { "▶" } else { " " };
        let color = if screen.selected == Some(id) {
            C_SELECTED
        } else {
            C_VALUE
        };
        text_at(out, 2, row, color, &format!("{marker} {id:>5}"))?;
        row += 1;
    }

    // Right column: details of the selected row
    if let Some(view_row) = screen.selected.and_then(|id| screen.cache.get(id)) {
        let details = [
            ("Drone ID", view_row.drone_id.to_string()),
            ("Time Stamp", format_timestamp(&view_row.timestamp)),
            ("Status", view_row.status.clone()),
            (
                "Battery",
                format!(
                    "{}% {}",
                    view_row.battery_percent,
                    view_row.battery_level().gauge()
                ),
            ),
            ("Speed", format!("{} km/h", view_row.speed)),
            ("Yaw", view_row.align_yaw.to_string()),
            ("Pitch", view_row.align_pitch.to_string()),
            ("Roll", view_row.align_roll.to_string()),
            ("Longitude", view_row.longitude.to_string()),
            ("Latitude", view_row.latitude.to_string()),
            ("Last Seen", format_timestamp(&view_row.last_seen)),
            ("Map", view_row.maps_url()),
        ];
        let width = view.width.saturating_sub(32) as usize;
        for (i, (label, value)) in details.iter().enumerate() {
            let r = 3 + i as u16;
            text_at(out, 14, r, C_LABEL, &format!("{label:>10}: "))?;
            text_at(out, 26, r, C_VALUE, &clip(value, width))?;
        }
    }

    if let Some(jump) = &screen.jump {
        text_at(
            out,
            2,
            view.height.saturating_sub(4),
            C_SELECTED,
            &format!("Go to row: {jump}_"),
        )?;
    }

    finish(
        out,
        view,
        screen.loading,
        screen.alert.as_deref(),
        "N/P : Next/Prev  L : Last  G : Go to row  +/- : Drone  R : Refresh  ESC : Menu",
    )
}

// ── Drone list ────────────────────────────────────────────────────────────────

pub fn render_drones<W: Write>(
    out: &mut W,
    view: Viewport,
    screen: &DronesScreen,
) -> std::io::Result<()> {
    begin(
        out,
        view,
        &format!("Drone History — offset {}", screen.pager.offset()),
    )?;

    let filter_line = format!(
        "Manufacturer: {:<14} Type: {:<14}",
        screen.filter.manufacturer, screen.filter.typename
    );
    text_at(out, 2, 2, C_LABEL, &filter_line)?;

    let header = format!(
        "{:>4}  {:<14} {:<14} {:<24} {:<14} {:>7}  {}",
        "ID", "Type", "Manufacturer", "Created", "Serial", "Weight", "Carriage"
    );
    text_at(out, 2, 4, C_TITLE, &header)?;

    let last_row = view.height.saturating_sub(4);
    for (i, drone) in screen.rows.iter().enumerate() {
        let row = 5 + i as u16;
        if row >= last_row {
            break;
        }
        let line = format!(
            "{:>4}  {} {} {} {} {:>7}  {}",
            drone.id,
            clip(&drone.typename, 14),
            clip(&drone.manufacturer, 14),
            clip(&format_timestamp(&drone.created), 24),
            clip(&drone.serialnumber, 14),
            drone.carriage_weight,
            drone.carriage_type
        );
        text_at(out, 2, row, C_VALUE, &line)?;
    }

    if let Some((field, draft)) = &screen.editing {
        let label = match field {
            FilterField::Manufacturer => "Search manufacturer",
            FilterField::Typename => "Search drone type",
        };
        text_at(out, 2, last_row, C_SELECTED, &format!("{label}: {draft}_"))?;
    }

    finish(
        out,
        view,
        screen.loading,
        screen.alert.as_deref(),
        "N/P : Next/Prev  L : Last  M/T : Filter  C : Clear  R : Refresh  ESC : Menu",
    )
}

// ── Drone types ───────────────────────────────────────────────────────────────

pub fn render_types<W: Write>(
    out: &mut W,
    view: Viewport,
    screen: &TypesScreen,
) -> std::io::Result<()> {
    begin(out, view, "Drone Catalogue")?;

    let header = format!(
        "{:>4}  {:<16} {:<16} {:>7} {:>9} {:>8} {:>7} {:>9}",
        "ID", "Manufacturer", "Type", "Weight", "MaxSpeed", "Battery", "Range", "Carriage"
    );
    text_at(out, 2, 3, C_TITLE, &header)?;

    let last_row = view.height.saturating_sub(3);
    for (i, kind) in screen.types.iter().enumerate() {
        let row = 4 + i as u16;
        if row >= last_row {
            break;
        }
        let line = format!(
            "{:>4}  {} {} {:>7} {:>9} {:>8} {:>7} {:>9}",
            kind.id,
            clip(&kind.manufacturer, 16),
            clip(&kind.typename, 16),
            kind.weight,
            kind.max_speed,
            kind.battery_capacity,
            kind.control_range,
            kind.max_carriage
        );
        text_at(out, 2, row, C_VALUE, &line)?;
    }

    finish(
        out,
        view,
        screen.loading,
        screen.alert.as_deref(),
        "R : Refresh  ESC : Menu  Q : Quit",
    )
}
