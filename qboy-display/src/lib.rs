//! Display abstraction and renderer for the Qboy pager
//!
//! This crate provides:
//! - `DisplayBackend` trait for character-cell displays
//! - `Screen` buffer sized for the 84x48 panel (14 columns, 6 rows)
//! - `Marquee` for the scrolling bottom row
//! - `Renderer` turning a `DisplayModel` into a screen
//!
//! # Layout
//!
//! ```text
//! row 0  WIFI:OK   1450     link label, order label
//! row 1  ──────────────     rule
//! row 2     AGUARDANDO      main text, centered,
//! row 3                     wrapped over two rows
//! row 4
//! row 5  AGUARDE SUA CH     scrolling message
//! ```

#![no_std]

pub mod backend;
pub mod marquee;
pub mod renderer;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use marquee::Marquee;
pub use renderer::Renderer;
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
