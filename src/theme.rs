//! Colors for the terminal UI and the per-type chip palette.

use ratatui::style::Color;

/// Plain sRGB triple, kept separate from ratatui so contrast math stays testable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(Rgb(r, g, b): Rgb) -> Self {
        Color::Rgb(r, g, b)
    }
}

/// Chip background per category tag. `unknown` and unlisted tags have none.
pub fn tag_rgb(tag: &str) -> Option<Rgb> {
    let rgb = match tag {
        "normal" => Rgb(128, 128, 128),     // gray
        "fighting" => Rgb(165, 42, 42),     // brown
        "flying" => Rgb(173, 216, 230),     // lightblue
        "poison" => Rgb(128, 0, 128),       // purple
        "ground" => Rgb(211, 211, 211),     // lightgray
        "rock" => Rgb(184, 134, 11),        // darkgoldenrod
        "bug" => Rgb(144, 238, 144),        // lightgreen
        "ghost" => Rgb(0, 0, 139),          // darkblue
        "steel" => Rgb(169, 169, 169),      // darkgrey
        "fire" => Rgb(255, 0, 0),
        "water" => Rgb(0, 0, 255),
        "grass" => Rgb(0, 128, 0),
        "electric" => Rgb(255, 255, 0),
        "psychic" => Rgb(255, 192, 203),    // pink
        "ice" => Rgb(0, 255, 255),          // cyan
        "dragon" => Rgb(119, 136, 153),     // lightslategray
        "dark" => Rgb(105, 105, 105),       // dimgray
        "fairy" => Rgb(255, 182, 193),      // lightpink
        "shadow" => Rgb(112, 128, 144),     // slategray
        _ => return None,
    };
    Some(rgb)
}

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);

/// WCAG relative luminance
pub fn relative_luminance(Rgb(r, g, b): Rgb) -> f64 {
    let lin = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
    };
    0.2126 * lin(r) + 0.7152 * lin(g) + 0.0722 * lin(b)
}

pub fn contrast_ratio(fg: Rgb, bg: Rgb) -> f64 {
    let l1 = relative_luminance(fg);
    let l2 = relative_luminance(bg);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Black or white, whichever reads better on `bg`
pub fn chip_text(bg: Rgb) -> Rgb {
    if contrast_ratio(BLACK, bg) >= contrast_ratio(WHITE, bg) { BLACK } else { WHITE }
}

/// (foreground, background) for a tag chip
pub fn tag_colors(tag: &str, theme: &Theme) -> (Color, Color) {
    match tag_rgb(tag) {
        Some(bg) => (chip_text(bg).into(), bg.into()),
        None => (theme.text, theme.chip_fallback),
    }
}

/// UI color scheme
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_dim: Color,
    pub focus_border: Color,
    pub unfocused_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Stats overlay panel (darkgrey)
    pub overlay_bg: Color,
    pub chip_fallback: Color,
    pub toast_success: Color,
    pub toast_error: Color,
    pub debug_indicator: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Black,
            text: Color::White,
            text_dim: Color::Gray,
            focus_border: Color::Yellow,
            unfocused_border: Color::Gray,
            selection_bg: Color::Rgb(40, 40, 40),
            selection_fg: Color::White,
            overlay_bg: Color::Rgb(169, 169, 169),
            chip_fallback: Color::DarkGray,
            toast_success: Color::Green,
            toast_error: Color::Red,
            debug_indicator: Color::Magenta,
        }
    }
}
