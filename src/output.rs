// src/output.rs

//! Console helpers: bold status messages and the color palette used to tag
//! multiplexed output.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};

/// Palette cycled through for concurrent commands.
pub const PALETTE: [Color; 12] = [
    Color::DarkCyan,
    Color::DarkYellow,
    Color::DarkGreen,
    Color::DarkMagenta,
    Color::DarkRed,
    Color::DarkBlue,
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::Blue,
];

/// Endless round-robin over [`PALETTE`].
pub fn iter_colors() -> impl Iterator<Item = Color> {
    PALETTE.iter().copied().cycle()
}

/// Write one bold status line.
pub fn write_message<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.bold())
}

/// Print one bold status line on stdout.
pub fn print_message(message: &str) {
    let mut stdout = io::stdout().lock();
    let _ = write_message(&mut stdout, message);
    let _ = stdout.flush();
}

/// `label | line` with a bold colored label.
pub fn labeled_line(label: &str, color: Color, line: &str) -> String {
    format!("{} | {}", label.with(color).bold(), line)
}
