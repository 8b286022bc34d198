//! Color palettes for the KSS client.
//!
//! Two palettes (light/dark) carrying the product's color values, selected
//! by the single theme flag owned by the App. Semantic status colors are
//! shared across both.

use ratatui::style::{Color, Modifier, Style};

// ── Semantic status colors (theme-independent) ────────────────────────────────

pub const C_OK: Color = Color::Rgb(80, 200, 120);
pub const C_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_WARNING: Color = Color::Rgb(255, 184, 80);
/// Border highlight for unread events.
pub const C_UNREAD: Color = Color::Rgb(91, 166, 255);
/// Background wash for important events.
pub const C_IMPORTANT: Color = Color::Rgb(230, 170, 104);

/// One theme's color table.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub button_bg: Color,
    pub button_text: Color,
    pub header: Color,
    pub header_text: Color,
    pub border: Color,
    pub selection_bg: Color,
}

pub const LIGHT: Palette = Palette {
    background: Color::Rgb(237, 243, 206),
    text: Color::Rgb(29, 26, 5),
    muted: Color::Rgb(120, 117, 96),
    button_bg: Color::Rgb(243, 208, 108),
    button_text: Color::Rgb(0, 0, 0),
    header: Color::Rgb(127, 176, 105),
    header_text: Color::Rgb(255, 255, 255),
    border: Color::Rgb(170, 178, 140),
    selection_bg: Color::Rgb(220, 228, 185),
};

pub const DARK: Palette = Palette {
    background: Color::Rgb(18, 18, 18),
    text: Color::Rgb(255, 255, 255),
    muted: Color::Rgb(115, 115, 138),
    button_bg: Color::Rgb(51, 51, 51),
    button_text: Color::Rgb(255, 255, 255),
    header: Color::Rgb(127, 176, 105),
    header_text: Color::Rgb(18, 18, 18),
    border: Color::Rgb(40, 40, 52),
    selection_bg: Color::Rgb(28, 28, 40),
};

pub fn palette(dark: bool) -> &'static Palette {
    if dark {
        &DARK
    } else {
        &LIGHT
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default(p: &Palette) -> Style {
    Style::default().fg(p.text)
}

pub fn style_muted(p: &Palette) -> Style {
    Style::default().fg(p.muted)
}

pub fn style_header(p: &Palette) -> Style {
    Style::default().fg(p.header_text).bg(p.header)
}

pub fn style_selected(p: &Palette) -> Style {
    Style::default()
        .bg(p.selection_bg)
        .fg(p.text)
        .add_modifier(Modifier::BOLD)
}

pub fn style_ok() -> Style {
    Style::default().fg(C_OK)
}

pub fn style_error() -> Style {
    Style::default().fg(C_ERROR)
}
