//! Screen composition
//!
//! Turns a [`DisplayModel`] into screen rows and draws them. Runs on every
//! refresh; drawing errors go back to the caller, who logs them and carries
//! on.

use core::fmt::Write;

use qboy_core::display::DisplayModel;

use crate::backend::{DisplayBackend, DisplayError};
use crate::marquee::Marquee;
use crate::screen::{clip, Line, Screen, SCREEN_COLS};

const HEADER_ROW: usize = 0;
const RULE_ROW: usize = 1;
const MAIN_ROWS: [usize; 2] = [2, 3];
const MESSAGE_ROW: usize = 5;

/// Pager screen renderer
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    screen: Screen,
    marquee: Marquee,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Compose the model into the screen buffer and advance the marquee
    pub fn compose(&mut self, model: &DisplayModel) {
        self.screen.set_line(HEADER_ROW, &header(model.link_label, &model.order_label));
        self.screen.set_rule(RULE_ROW, true);

        let wrapped = wrap(&model.main_text);
        for (row, text) in MAIN_ROWS.iter().zip(wrapped.iter()) {
            self.screen.set_line(*row, &centered(text));
        }

        self.marquee.set_message(&model.message);
        self.screen.set_line(MESSAGE_ROW, &self.marquee.window());
        self.marquee.advance();
    }

    /// Compose and draw one frame
    pub fn render<B: DisplayBackend + ?Sized>(
        &mut self,
        model: &DisplayModel,
        backend: &mut B,
    ) -> Result<(), DisplayError> {
        self.compose(model);
        self.screen.draw(backend)
    }
}

/// `WIFI:OK` left, order label right
fn header(link_label: &str, order_label: &str) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "WIFI:{}", link_label);
    let mut line = clip(&line);

    let used = line.chars().count();
    let order_len = order_label.chars().count();
    if used + 1 + order_len <= SCREEN_COLS {
        for _ in used..SCREEN_COLS - order_len {
            let _ = line.push(' ');
        }
        for ch in order_label.chars() {
            let _ = line.push(ch);
        }
    }
    line
}

fn centered(text: &str) -> Line {
    let mut line = Line::new();
    let len = text.chars().count().min(SCREEN_COLS);
    for _ in 0..(SCREEN_COLS - len) / 2 {
        let _ = line.push(' ');
    }
    for ch in text.chars().take(len) {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

/// Greedy word wrap over the main rows
///
/// Words longer than a row are split. Text that does not fit in two rows
/// is cut.
fn wrap(text: &str) -> [Line; 2] {
    let mut rows: [Line; 2] = Default::default();
    let mut row = 0;

    for word in text.split_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            if row >= rows.len() {
                return rows;
            }
            let used = rows[row].chars().count();
            let space = usize::from(used > 0);
            let free = SCREEN_COLS.saturating_sub(used + space);
            let word_len = rest.chars().count();

            if word_len <= free {
                if space == 1 {
                    let _ = rows[row].push(' ');
                }
                push_chars(&mut rows[row], rest);
                rest = "";
            } else if used == 0 {
                // Split a word wider than the row
                let cut = rest
                    .char_indices()
                    .nth(SCREEN_COLS)
                    .map_or(rest.len(), |(i, _)| i);
                push_chars(&mut rows[row], &rest[..cut]);
                rest = &rest[cut..];
                row += 1;
            } else {
                row += 1;
            }
        }
    }
    rows
}

fn push_chars(line: &mut Line, text: &str) {
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
}
