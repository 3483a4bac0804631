use bracket_engine::{Match, Participant, Round, Side};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: player1 line, status line, player2 line.
pub const GAME_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Widest match cell, used when the terminal has room to spare.
const CELL_W_FULL: u16 = 24;

/// Narrowest match cell. Below this the grid scrolls horizontally instead.
const CELL_W_MIN: u16 = 14;

/// Rows reserved for one match at `depth` together with everything feeding it.
///
/// `slot_height(0) = GAME_HEIGHT` and `slot_height(d) = 2 * slot_height(d - 1) + 1`,
/// which closes to `(GAME_HEIGHT + 1) * 2^d - 1`.
pub fn slot_height(depth: usize) -> u16 {
    ((GAME_HEIGHT + 1) << depth) - 1
}

// ---------------------------------------------------------------------------
// GameCell: pre-computed position for one match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GameCell {
    /// Row of the status line (middle of the 3-row cell), grid-relative.
    pub center_row: u16,
    /// First column of the cell, grid-relative.
    pub col: u16,
    pub cell_width: u16,
    pub round: usize,
    pub slot: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid: layout engine for the whole tree
// ---------------------------------------------------------------------------

/// Pre-computed layout for a bracket of `rounds` rounds, first round on the
/// left and the final on the right.
///
/// Center rows follow the triangle formula
/// `center[d][i] = slot_height(d) / 2 + i * (slot_height(d + 1) - slot_height(d))`,
/// so for a 16-player bracket:
///
/// ```text
/// Round 1       (d=0): [1, 5, 9, 13, 17, 21, 25, 29]
/// Quarter Final (d=1): [3, 11, 19, 27]
/// Semi Final    (d=2): [7, 23]
/// Final         (d=3): [15]
/// ```
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// Depth-major: every round-0 cell, then round 1, and so on.
    pub cells: Vec<GameCell>,
    pub round_cols: Vec<u16>,
    pub total_width: u16,
    pub total_height: u16,
    pub cell_width: u16,
    offsets: Vec<usize>,
}

impl BracketGrid {
    pub fn compute(rounds: usize, terminal_width: u16) -> Self {
        let rounds = rounds.max(1);
        let columns = rounds as u16;
        let connector_total = CONNECTOR_WIDTH * (columns - 1);
        let per_col = terminal_width.saturating_sub(connector_total) / columns;
        let cell_width = per_col.clamp(CELL_W_MIN, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;

        let round_cols: Vec<u16> = (0..columns).map(|d| d * stride).collect();
        let total_width = stride * (columns - 1) + cell_width;
        let total_height = slot_height(rounds - 1);

        let mut cells = Vec::with_capacity((1 << rounds) - 1);
        let mut offsets = Vec::with_capacity(rounds + 1);
        for depth in 0..rounds {
            offsets.push(cells.len());
            let first_center = slot_height(depth) / 2;
            let spacing = slot_height(depth + 1) - slot_height(depth);
            let count = 1usize << (rounds - 1 - depth);
            for slot in 0..count {
                cells.push(GameCell {
                    center_row: first_center + slot as u16 * spacing,
                    col: round_cols[depth],
                    cell_width,
                    round: depth,
                    slot,
                });
            }
        }
        offsets.push(cells.len());

        Self {
            cells,
            round_cols,
            total_width,
            total_height,
            cell_width,
            offsets,
        }
    }

    pub fn rounds(&self) -> usize {
        self.round_cols.len()
    }

    pub fn cells_for_round(&self, round: usize) -> &[GameCell] {
        match (self.offsets.get(round), self.offsets.get(round + 1)) {
            (Some(&start), Some(&end)) => &self.cells[start..end],
            _ => &[],
        }
    }

    pub fn cell(&self, round: usize, slot: usize) -> Option<&GameCell> {
        self.cells_for_round(round).get(slot)
    }

    /// Scroll offsets `(x, y)` that keep the given match inside a viewport
    /// of `width` x `height`, with the match vertically centered when the
    /// grid is taller than the viewport.
    pub fn scroll_for(&self, round: usize, slot: usize, width: u16, height: u16) -> (u16, u16) {
        let Some(cell) = self.cell(round, slot) else {
            return (0, 0);
        };

        let right_edge = cell.col + cell.cell_width;
        let scroll_x = right_edge
            .saturating_sub(width)
            .min(self.total_width.saturating_sub(width));

        let max_y = self.total_height.saturating_sub(height);
        let scroll_y = cell.center_row.saturating_sub(height / 2).min(max_y);
        (scroll_x, scroll_y)
    }
}

// ---------------------------------------------------------------------------
// Viewport: grid coordinates to screen coordinates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Viewport {
    area: Rect,
    scroll_x: u16,
    scroll_y: u16,
}

impl Viewport {
    fn to_screen(self, grid_x: u16, grid_y: u16) -> Option<(u16, u16)> {
        let rel_x = grid_x.checked_sub(self.scroll_x)?;
        let rel_y = grid_y.checked_sub(self.scroll_y)?;
        if rel_x >= self.area.width || rel_y >= self.area.height {
            return None;
        }
        Some((self.area.x + rel_x, self.area.y + rel_y))
    }

    fn put_str(self, buf: &mut Buffer, grid_x: u16, grid_y: u16, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            if let Some((x, y)) = self.to_screen(grid_x + i as u16, grid_y) {
                put_char(buf, x, y, ch, style);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders every round of the tree with connectors between them.
pub struct BracketView<'a> {
    pub rounds: &'a [Round],
    /// Pre-computed layout for `rounds.len()` rounds.
    pub grid: &'a BracketGrid,
    pub selected_round: usize,
    pub selected_slot: usize,
    pub selected_side: Side,
    pub theme: BannerTheme,
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < CELL_W_MIN || area.height < GAME_HEIGHT {
            return;
        }

        let (scroll_x, scroll_y) = self.grid.scroll_for(
            self.selected_round,
            self.selected_slot,
            area.width,
            area.height,
        );
        let view = Viewport {
            area,
            scroll_x,
            scroll_y,
        };

        for cell in &self.grid.cells {
            let Some(m) = self.rounds.get(cell.round).and_then(|r| r.matches.get(cell.slot)) else {
                continue;
            };
            let selected = (cell.round == self.selected_round && cell.slot == self.selected_slot)
                .then_some(self.selected_side);
            draw_game_cell(m, cell, selected, view, self.theme, buf);
        }

        // Each match in round d + 1 joins its two feeders in round d.
        for round in 0..self.grid.rounds().saturating_sub(1) {
            let children = self.grid.cells_for_round(round);
            let parents = self.grid.cells_for_round(round + 1);
            let conn_x = self.grid.round_cols[round] + self.grid.cell_width;
            for (j, parent) in parents.iter().enumerate() {
                let (Some(top), Some(bot)) = (children.get(2 * j), children.get(2 * j + 1)) else {
                    continue;
                };
                draw_connector(
                    top.center_row,
                    parent.center_row,
                    bot.center_row,
                    conn_x,
                    view,
                    self.theme,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ChampionView widget
// ---------------------------------------------------------------------------

/// Boxed champion banner:
///
/// ```text
///     ── CHAMPION ──
///  ╭──────────────────╮
///  │ Player 1 (Seed 1)│
///  ╰──────────────────╯
/// ```
pub struct ChampionView<'a> {
    pub champion: Option<&'a Participant>,
    pub theme: BannerTheme,
}

impl<'a> Widget for ChampionView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 4 || area.width < 8 {
            return;
        }

        let accent = resolve(BannerColor::Accent, self.theme);
        let dim = resolve(BannerColor::Dim, self.theme);

        let title = "── CHAMPION ──";
        let tx = area.x + area.width.saturating_sub(title.chars().count() as u16) / 2;
        buf.set_string(tx, area.y, title, accent);

        let (label, style) = match self.champion {
            Some(p) => (p.label(), resolve(BannerColor::Winner, self.theme)),
            None => ("TBD".to_string(), dim),
        };
        let inner_w = (label.chars().count() as u16 + 2).min(area.width.saturating_sub(2));
        let box_w = inner_w + 2;
        let x0 = area.x + area.width.saturating_sub(box_w) / 2;
        let border = if self.champion.is_some() { accent } else { dim };
        let horizontal = "─".repeat(inner_w as usize);

        buf.set_string(x0, area.y + 1, format!("╭{horizontal}╮"), border);
        buf.set_string(x0, area.y + 2, "│", border);
        let text = fit(&format!(" {label}"), inner_w as usize);
        buf.set_string(x0 + 1, area.y + 2, text, style);
        buf.set_string(x0 + box_w - 1, area.y + 2, "│", border);
        buf.set_string(x0, area.y + 3, format!("╰{horizontal}╯"), border);
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Draw one match cell. `selected` carries the highlighted side when this is
/// the selected match.
fn draw_game_cell(
    m: &Match,
    cell: &GameCell,
    selected: Option<Side>,
    view: Viewport,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let winner_style = resolve(BannerColor::Winner, theme);
    let dim = resolve(BannerColor::Dim, theme);
    let bye = resolve(BannerColor::Bye, theme);
    let base_style = if selected.is_some() {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let width = cell.cell_width as usize;
    let winning_side = m.winning_side();
    let placeholder = if cell.round == 0 { "BYE" } else { "TBD" };

    for (row, side) in [
        (cell.center_row.saturating_sub(1), Side::Player1),
        (cell.center_row + 1, Side::Player2),
    ] {
        let participant = m.player(side);
        let marker = selected == Some(side);
        let content = format_player_line(participant, placeholder, marker, winning_side == Some(side), width);
        let mut style = match (participant, winning_side) {
            (None, _) => bye,
            (Some(_), Some(w)) if w == side => winner_style,
            (Some(_), Some(_)) => dim,
            (Some(_), None) => base_style,
        };
        if marker {
            style = style.add_modifier(Modifier::REVERSED);
        }
        view.put_str(buf, cell.col, row, &content, style);
    }

    let status_style = if m.is_completed() { dim } else { resolve(BannerColor::Primary, theme) };
    view.put_str(buf, cell.col, cell.center_row, &format_status_line(m, width), status_style);
}

/// One participant row: `"> 4 Player 4          ✓"`, exactly `width` chars.
pub fn format_player_line(
    participant: Option<&Participant>,
    placeholder: &str,
    marker: bool,
    is_winner: bool,
    width: usize,
) -> String {
    let marker = if marker { '>' } else { ' ' };
    let seed = match participant.and_then(|p| p.seed) {
        Some(seed) => format!("{seed:>2}"),
        None => " -".to_string(),
    };
    let name = participant.map(|p| p.name.as_str()).unwrap_or(placeholder);
    let mark = if is_winner { '✓' } else { ' ' };
    // marker(1) seed(2) sp(1) name sp(1) mark(1)
    let name_w = width.saturating_sub(6);
    fit(&format!("{marker}{seed} {} {mark}", fit(name, name_w)), width)
}

fn format_status_line(m: &Match, width: usize) -> String {
    let raw = match (m.is_completed(), m.is_bye, m.player1.is_some() && m.player2.is_some()) {
        (true, true, _) => "   BYE",
        (true, false, _) => "   DONE",
        (false, true, _) => "   bye",
        (false, false, true) => "   vs",
        (false, false, false) => "   tbd",
    };
    fit(raw, width)
}

/// Truncate or pad `text` to exactly `width` chars.
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

/// Draw box-drawing connectors between one parent and its two feeders.
///
/// ```text
///  child_top  ──┐         (col_a='─'  col_b='┐')
///               │         (col_b='│')
///  parent     ──├──       (col_a='─'  col_b='├'  col_c='─')
///               │         (col_b='│')
///  child_bot  ──┘         (col_a='─'  col_b='┘')
/// ```
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_x: u16,
    view: Viewport,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let style = resolve(BannerColor::Dim, theme);
    let col_a = conn_x;
    let col_b = conn_x + 1;
    let col_c = conn_x + 2;

    let mut put = |x: u16, row: u16, ch: char| {
        if let Some((sx, sy)) = view.to_screen(x, row) {
            put_char(buf, sx, sy, ch, style);
        }
    };

    put(col_a, r_top, '─');
    put(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put(col_b, row, '│');
    }
    put(col_a, r_mid, '─');
    put(col_b, r_mid, '├');
    put(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put(col_b, row, '│');
    }
    put(col_a, r_bot, '─');
    put(col_b, r_bot, '┘');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
