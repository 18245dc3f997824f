//! Screen buffer
//!
//! Character grid matching the panel, with a dirty flag so unchanged frames
//! are not resent.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows (48 px / 8 px font)
pub const SCREEN_ROWS: usize = 6;

/// Number of character columns (84 px / 6 px font)
pub const SCREEN_COLS: usize = 14;

/// Byte capacity of a line; every column may hold a 4-byte UTF-8 char
pub const LINE_BYTES: usize = SCREEN_COLS * 4;

/// One screen line, at most [`SCREEN_COLS`] characters
pub type Line = String<LINE_BYTES>;

/// Copy up to [`SCREEN_COLS`] characters of `text` into a line
pub(crate) fn clip(text: &str) -> Line {
    let mut line = Line::new();
    for ch in text.chars().take(SCREEN_COLS) {
        if line.push(ch).is_err() {
            break;
        }
    }
    line
}

/// Screen buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    lines: [Line; SCREEN_ROWS],
    rules: [bool; SCREEN_ROWS],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            rules: [false; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Set the content of a row, truncating at the screen width
    ///
    /// Marks the screen dirty only if the row changed.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let new = clip(text);
        if *line != new {
            *line = new;
            self.dirty = true;
        }
    }

    /// Draw a rule through a row instead of text
    pub fn set_rule(&mut self, row: usize, rule: bool) {
        if let Some(r) = self.rules.get_mut(row) {
            if *r != rule {
                *r = rule;
                self.dirty = true;
            }
        }
    }

    /// Get the content of a row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Draw the buffer to a backend and flush it
    ///
    /// The screen stays dirty if drawing fails, so the next refresh retries.
    pub fn draw<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        if !self.dirty {
            return Ok(());
        }

        backend.clear()?;
        for (row, line) in self.lines.iter().enumerate() {
            if self.rules[row] {
                backend.draw_rule(row as u8)?;
            } else if !line.is_empty() {
                backend.draw_text(row as u8, 0, line)?;
            }
        }
        backend.flush()?;

        self.dirty = false;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Backend recording the last frame
    pub struct MockBackend {
        pub frame: [Line; SCREEN_ROWS],
        pub rules: [bool; SCREEN_ROWS],
        pub flushes: u32,
        pub fail: bool,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self {
                frame: core::array::from_fn(|_| String::new()),
                rules: [false; SCREEN_ROWS],
                flushes: 0,
                fail: false,
            }
        }

        pub fn row(&self, row: usize) -> &str {
            &self.frame[row]
        }
    }

    impl DisplayBackend for MockBackend {
        fn init(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            for line in &mut self.frame {
                line.clear();
            }
            self.rules = [false; SCREEN_ROWS];
            Ok(())
        }

        fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
            let line = self
                .frame
                .get_mut(row as usize)
                .ok_or(DisplayError::InvalidCoordinates)?;
            for _ in 0..col {
                let _ = line.push(' ');
            }
            line.push_str(text)
                .map_err(|_| DisplayError::InvalidCoordinates)
        }

        fn draw_rule(&mut self, row: u8) -> Result<(), DisplayError> {
            self.rules[row as usize] = true;
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (SCREEN_COLS as u8, SCREEN_ROWS as u8)
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_set_line_truncates() {
        let mut screen = Screen::new();
        screen.set_line(0, "ASSOCIE O DISPOSITIVO");
        assert_eq!(screen.line(0), Some("ASSOCIE O DISP"));
        assert_eq!(screen.line(SCREEN_ROWS), None);
    }

    #[test]
    fn test_set_line_counts_characters() {
        let mut screen = Screen::new();
        screen.set_line(2, "CONSULTÓRIO ÁREA ÉTICA");
        assert_eq!(screen.line(2), Some("CONSULTÓRIO ÁR"));

        screen.set_line(3, "ÁÉÍÓÚ ÇÃÕ");
        assert_eq!(screen.line(3), Some("ÁÉÍÓÚ ÇÃÕ"));

        let mut full: String<64> = String::new();
        for _ in 0..SCREEN_COLS + 3 {
            full.push('Ç').unwrap();
        }
        screen.set_line(4, &full);
        assert_eq!(screen.line(4).map(|l| l.chars().count()), Some(SCREEN_COLS));
    }

    #[test]
    fn test_dirty_only_on_change() {
        let mut screen = Screen::new();
        let mut backend = MockBackend::new();
        screen.set_line(2, "AGUARDANDO");
        screen.draw(&mut backend).unwrap();
        assert!(!screen.is_dirty());

        screen.set_line(2, "AGUARDANDO");
        assert!(!screen.is_dirty());
        screen.draw(&mut backend).unwrap();
        assert_eq!(backend.flushes, 1);

        screen.set_line(2, "07");
        assert!(screen.is_dirty());
    }

    #[test]
    fn test_draw_rows_and_rules() {
        let mut screen = Screen::new();
        let mut backend = MockBackend::new();
        screen.set_line(0, "WIFI:OK");
        screen.set_rule(1, true);
        screen.draw(&mut backend).unwrap();

        assert_eq!(backend.row(0), "WIFI:OK");
        assert!(backend.rules[1]);
        assert!(!backend.rules[0]);
    }

    #[test]
    fn test_failed_draw_stays_dirty() {
        let mut screen = Screen::new();
        let mut backend = MockBackend::new();
        backend.fail = true;
        assert_eq!(screen.draw(&mut backend), Err(DisplayError::Communication));
        assert!(screen.is_dirty());
    }
}
