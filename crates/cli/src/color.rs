// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use hc_core::RunState;
use std::io::IsTerminal;

pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and context: medium grey
    pub const CONTEXT: u8 = 245;
    /// Muted / secondary text: darker grey
    pub const MUTED: u8 = 240;
    /// Active harvest: sage green
    pub const ACTIVE: u8 = 108;
    /// Winding down or possibly stale: amber
    pub const WARN: u8 = 179;
    /// Failed: brick red
    pub const FAILED: u8 = 167;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    crate::env::color_override().unwrap_or_else(|| std::io::stdout().is_terminal())
}

/// Build clap `Styles` using the project palette.
pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::HEADER)))))
        .literal(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::LITERAL)))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(codes::CONTEXT)))))
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

fn paint(code: u8, text: &str) -> String {
    if should_colorize() {
        format!("{}{}{}", fg256(code), text, RESET)
    } else {
        text.to_string()
    }
}

/// Format text with the header color (steel blue).
pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

/// Format text with the muted color (darker grey).
pub fn muted(text: &str) -> String {
    paint(codes::MUTED, text)
}

pub fn warn(text: &str) -> String {
    paint(codes::WARN, text)
}

pub fn failed(text: &str) -> String {
    paint(codes::FAILED, text)
}

/// Color a status word by what it says about the harvest.
pub fn status(text: &str) -> String {
    match text.parse::<RunState>() {
        Ok(state) => run_state_text(state, text),
        Err(_) => text.to_string(),
    }
}

fn run_state_text(state: RunState, text: &str) -> String {
    match state {
        RunState::Waiting => muted(text),
        RunState::Running => paint(codes::ACTIVE, text),
        RunState::Stopping => warn(text),
        RunState::Error => failed(text),
    }
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
