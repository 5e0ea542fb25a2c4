//! Shared UI theme constants.

use ratatui::style::Color;

pub const PRIMARY: Color = Color::Rgb(255, 255, 255);
pub const SECONDARY: Color = Color::Rgb(0x69, 0x69, 0x69);
pub const HIGHLIGHT: Color = Color::Rgb(0x8b, 0x2d, 0xef);
pub const BORDER: Color = Color::Rgb(0x38, 0x38, 0x38);
pub const GREEN: Color = Color::Rgb(0, 255, 0);
pub const RED: Color = Color::Rgb(255, 0, 0);
