//! Display backend trait
//!
//! Defines the interface for the pager's display.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Display backend trait
///
/// Character-cell interface. Implementations buffer drawing and send the
/// frame to the panel on [`flush`](Self::flush).
pub trait DisplayBackend {
    /// Reset and configure the panel
    ///
    /// Failure here is fatal for the device.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column (character units)
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Draw a horizontal rule across the middle of a row
    fn draw_rule(&mut self, row: u8) -> Result<(), DisplayError>;

    /// Send the frame buffer to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    /// Check if the display is ready
    fn is_ready(&self) -> bool;
}
