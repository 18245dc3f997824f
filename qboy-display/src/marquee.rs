//! Scrolling message row

use qboy_core::display::MessageText;

use crate::screen::{Line, SCREEN_COLS};

/// Gap inserted between the end of a message and its restart
const GAP: &str = " - ";

/// Scroll state for the bottom row
///
/// The offset moves one character per [`advance`](Self::advance) whatever
/// the message is. A message that fits the row is padded to the row width
/// and rotates within it. A longer one scrolls through itself and a
/// separator before wrapping. Replacing the message keeps the offset, folded
/// into the new cycle.
#[derive(Debug, Clone, Default)]
pub struct Marquee {
    message: MessageText,
    offset: usize,
}

impl Marquee {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track the message for the next window
    pub fn set_message(&mut self, message: &str) {
        if self.message.as_str() == message {
            return;
        }
        self.message.clear();
        for ch in message.chars() {
            if self.message.push(ch).is_err() {
                break;
            }
        }
        self.offset %= self.cycle_len();
    }

    /// Current scroll offset in characters
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Characters in one full rotation
    fn cycle_len(&self) -> usize {
        let len = self.message.chars().count();
        if len <= SCREEN_COLS {
            SCREEN_COLS
        } else {
            len + GAP.chars().count()
        }
    }

    /// Visible window at the current offset
    pub fn window(&self) -> Line {
        let len = self.message.chars().count();
        let mut line = Line::new();

        if len <= SCREEN_COLS {
            let padded = self
                .message
                .chars()
                .chain(core::iter::repeat(' '))
                .take(SCREEN_COLS);
            let rotated = padded.clone().chain(padded).skip(self.offset).take(SCREEN_COLS);
            for ch in rotated {
                if line.push(ch).is_err() {
                    break;
                }
            }
            return line;
        }

        let cycle = self.message.chars().chain(GAP.chars());
        for ch in cycle.clone().chain(cycle).skip(self.offset).take(SCREEN_COLS) {
            if line.push(ch).is_err() {
                break;
            }
        }
        line
    }

    /// Step one character
    pub fn advance(&mut self) {
        self.offset = (self.offset + 1) % self.cycle_len();
    }
}
