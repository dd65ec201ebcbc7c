// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the quire CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `QUIRE_THEME` first, then `COLORFGBG`, then defaults to dark. `NO_COLOR`
//! and non-TTY stdout turn colors off entirely, so piped output stays plain.
//!
//! # Theme detection order
//!
//! 1. `QUIRE_THEME` env var ("dark" or "light")
//! 2. `COLORFGBG` env var (terminal background hint)
//! 3. Default to dark theme

use std::sync::OnceLock;
use std::time::Duration;

use quire::{ElementType, IndexStatus, MatchType};

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

/// Terminal color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Cached theme detection result
static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("QUIRE_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; backgrounds 7 and up (except 8) are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    Theme::Dark
}

/// Get the current theme (cached)
pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// ONEDARK / ONE LIGHT COLOR PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════

/// True color escape sequence helper
fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const UNDERLINE: &str = "\x1b[4m";
}

pub use colors::*;

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);     // #e06c75
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);   // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);  // #e5c07b
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);     // #61afef
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221); // #c678dd
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);     // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);      // #5c6370
    pub const BRIGHT_GREEN: (u8, u8, u8) = (166, 226, 46);
    pub const BRIGHT_YELLOW: (u8, u8, u8) = (255, 215, 0);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);       // #e45649
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);     // #50a14f
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);    // #c18401
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);     // #4078f2
    pub const MAGENTA: (u8, u8, u8) = (166, 38, 164);  // #a626a4
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);      // #0184bc
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);    // #a0a1a7
    pub const BRIGHT_GREEN: (u8, u8, u8) = (68, 140, 39);
    pub const BRIGHT_YELLOW: (u8, u8, u8) = (152, 104, 1);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

// ═══════════════════════════════════════════════════════════════════════════
// THEME-AWARE COLOR ACCESSORS
// ═══════════════════════════════════════════════════════════════════════════

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_GREEN);
theme_color!(BRIGHT_YELLOW);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Check if colors should be used (TTY detection)
pub fn use_colors() -> bool {
    // Respect NO_COLOR standard
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply theme color with optional modifiers
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Calculate visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

/// Cut a plain string to `max` visible characters, marking the cut with "…".
pub fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Print `│ content │`, padded to the box width.
pub fn row(content: &str) {
    let border = GRAY();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{border}│{RESET}{content}{}{border}│{RESET}", " ".repeat(pad));
}

/// A labelled horizontal rule between two corner glyphs.
fn labelled_rule(left: char, right: char, label: &str) {
    let border = GRAY();
    let label = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let fill = "─".repeat(BOX_WIDTH.saturating_sub(visible_len(&label)));
    println!("{border}{left}{RESET}{label}{border}{fill}{right}{RESET}");
}

/// `┌─ LABEL ───┐`
pub fn section_top(label: &str) {
    labelled_rule('┌', '┐', label);
}

/// `├─ LABEL ───┤`
pub fn section_mid(label: &str) {
    labelled_rule('├', '┤', label);
}

/// `└───────────┘`
pub fn section_bot() {
    println!("{}└{}┘{}", GRAY(), "─".repeat(BOX_WIDTH), RESET);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Left-pad a styled string to a fixed visible width
pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - visible), s)
    }
}

/// Right-pad a styled string to a fixed visible width
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Format a character count as a human-readable size
pub fn format_chars(chars: usize) -> String {
    if chars >= 1024 * 1024 {
        format!("{:.1}M chars", chars as f64 / 1024.0 / 1024.0)
    } else if chars >= 1024 {
        format!("{:.1}K chars", chars as f64 / 1024.0)
    } else {
        format!("{} chars", chars)
    }
}

/// Color-coded match type label
pub fn match_type_label(match_type: &MatchType) -> String {
    let text = match match_type {
        MatchType::Exact => "exact".to_string(),
        MatchType::Fuzzy { similarity } => format!("fuzzy {:.2}", similarity),
        MatchType::Structural => "structural".to_string(),
    };
    let color: fn() -> String = match match_type {
        MatchType::Exact => GREEN,
        MatchType::Fuzzy { .. } => YELLOW,
        MatchType::Structural => BRIGHT_CYAN,
    };
    themed(color, &[], &text)
}

/// Color-coded element label: H1..H6, body, code, link
pub fn element_label(element: ElementType) -> String {
    match element {
        ElementType::Heading(level) => themed(MAGENTA, &[BOLD], &format!("H{}", level)),
        ElementType::Code => themed(BLUE, &[], "code"),
        ElementType::Link => themed(CYAN, &[UNDERLINE], "link"),
        ElementType::Body => themed(GRAY, &[], "body"),
    }
}

/// Color-coded index status
pub fn status_label(status: &IndexStatus) -> String {
    let color: fn() -> String = match status {
        IndexStatus::Ready { truncated: false } => GREEN,
        IndexStatus::Ready { truncated: true } => YELLOW,
        IndexStatus::Indexing | IndexStatus::Reindexing => BLUE,
        IndexStatus::Failed { .. } => RED,
    };
    themed(color, &[BOLD], status.label())
}

/// Color-coded timing value in ms (green=fast, yellow=medium, red=slow)
pub fn timing_ms(duration: Duration) -> String {
    let value = duration.as_secs_f64() * 1000.0;
    if !use_colors() {
        return format!("{:>9.3}", value);
    }
    let color = if value < 5.0 {
        GREEN()
    } else if value < 100.0 {
        YELLOW()
    } else {
        RED()
    };
    format!("{}{:>9.3}{}", color, value, RESET)
}

/// Color-coded score value. A heading hit scores at least 2.
pub fn score_value(score: f64) -> String {
    if !use_colors() {
        return format!("{:>6.2}", score);
    }
    let color = if score >= 3.0 {
        BRIGHT_GREEN()
    } else if score >= 2.0 {
        GREEN()
    } else if score >= 1.0 {
        BRIGHT_YELLOW()
    } else {
        GRAY()
    };
    format!("{}{:>6.2}{}", color, score, RESET)
}

/// Open/close markers for the highlighted match inside a snippet.
pub fn highlight_markers() -> (String, String) {
    if use_colors() {
        (format!("{}{}", BOLD, BRIGHT_YELLOW()), RESET.to_string())
    } else {
        ("[".to_string(), "]".to_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
