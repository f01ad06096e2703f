//! Console tables with optional per-row card colors.
//!
//! Layout and styling are delegated to `comfy-table`; a row's tint becomes
//! the foreground color of every cell in it.

use comfy_table::{presets, Cell, Color, Table};

/// Terminal color for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    White,
    Blue,
    Yellow,
    Red,
    Green,
}

impl Tint {
    fn color(self) -> Color {
        match self {
            Tint::White => Color::White,
            Tint::Blue => Color::Blue,
            Tint::Yellow => Color::Yellow,
            Tint::Red => Color::Red,
            Tint::Green => Color::Green,
        }
    }

    /// Tint for a card color string from the ratings source. Multicolor
    /// and colorless cards are left untinted.
    pub fn for_card_color(color: &str) -> Option<Tint> {
        match color {
            "W" => Some(Tint::White),
            "U" => Some(Tint::Blue),
            "B" => Some(Tint::Yellow),
            "R" => Some(Tint::Red),
            "G" => Some(Tint::Green),
            _ => None,
        }
    }
}

/// Header plus tinted rows, rendered on demand.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<(Vec<String>, Option<Tint>)>,
}

impl TextTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, cells: Vec<String>, tint: Option<Tint>) {
        self.rows.push((cells, tint));
    }

    /// Render with a trailing newline. With `color` off no escape codes are
    /// emitted, whatever the output stream is.
    pub fn render(&self, color: bool) -> String {
        let mut table = Table::new();
        table
            .load_preset(presets::ASCII_FULL_CONDENSED)
            .set_header(self.headers.iter().map(Cell::new));
        if color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }

        for (cells, tint) in &self.rows {
            let tint = if color { *tint } else { None };
            table.add_row(cells.iter().map(|text| match tint {
                Some(t) => Cell::new(text).fg(t.color()),
                None => Cell::new(text),
            }));
        }
        format!("{table}\n")
    }
}
