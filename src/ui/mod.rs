//! Terminal UI components
//!
//! Built with ratatui in the neon palette. Keyboard-first throughout.

pub mod theme;
pub mod detail;
pub mod modal;
pub mod similar;

pub use detail::render_page;
pub use theme::Theme;
