//! Writing rendered buffers to a terminal or a plain stream
//!
//! The report is drawn off-screen, so it scrolls like ordinary program output
//! and survives redirection. Styled output uses crossterm escape sequences;
//! plain output drops all styling.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{
        Attribute, Color as CColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};
use ratatui::{
    buffer::{Buffer, Cell},
    style::{Color, Modifier},
};

/// Returns the visible text of each buffer row with trailing blanks removed
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    rows(buffer)
        .map(|row| {
            let line: String = row.iter().map(|cell| cell.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}

/// Writes every row of `buffer` followed by a newline
///
/// # Arguments
/// * `out` - Destination stream
/// * `buffer` - Rendered content
/// * `styled` - Emit colors and attributes when true
pub fn write_buffer<W: Write>(out: &mut W, buffer: &Buffer, styled: bool) -> io::Result<()> {
    if !styled {
        for line in buffer_lines(buffer) {
            writeln!(out, "{}", line)?;
        }
        return out.flush();
    }

    for row in rows(buffer) {
        let visible = row
            .iter()
            .rposition(|cell| !cell.symbol().trim().is_empty() || cell.bg != Color::Reset)
            .map_or(0, |last| last + 1);

        let mut current: Option<(Color, Color, Modifier)> = None;
        for cell in &row[..visible] {
            let style = (cell.fg, cell.bg, cell.modifier);
            if current != Some(style) {
                queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                if cell.fg != Color::Reset {
                    queue!(out, SetForegroundColor(to_crossterm_color(cell.fg)))?;
                }
                if cell.bg != Color::Reset {
                    queue!(out, SetBackgroundColor(to_crossterm_color(cell.bg)))?;
                }
                for attribute in attributes(cell.modifier) {
                    queue!(out, SetAttribute(attribute))?;
                }
                current = Some(style);
            }
            queue!(out, Print(cell.symbol()))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }

    out.flush()
}

/// Writes buffers one after another, as one continuous block of output
pub fn write_buffers<W: Write>(out: &mut W, buffers: &[Buffer], styled: bool) -> io::Result<()> {
    for buffer in buffers {
        write_buffer(out, buffer, styled)?;
    }
    Ok(())
}

/// Iterates the buffer row by row, skipping cells hidden behind wide glyphs
fn rows(buffer: &Buffer) -> impl Iterator<Item = Vec<&Cell>> {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width.max(1))
        .map(|row| row.iter().filter(|cell| !cell.skip).collect())
}

/// Maps ratatui modifiers to crossterm attributes
fn attributes(modifier: Modifier) -> Vec<Attribute> {
    [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::REVERSED, Attribute::Reverse),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    ]
    .into_iter()
    .filter(|(m, _)| modifier.contains(*m))
    .map(|(_, attribute)| attribute)
    .collect()
}

/// Maps a ratatui color to the crossterm color with the same ANSI meaning
fn to_crossterm_color(color: Color) -> CColor {
    match color {
        Color::Reset => CColor::Reset,
        Color::Black => CColor::Black,
        Color::Red => CColor::DarkRed,
        Color::Green => CColor::DarkGreen,
        Color::Yellow => CColor::DarkYellow,
        Color::Blue => CColor::DarkBlue,
        Color::Magenta => CColor::DarkMagenta,
        Color::Cyan => CColor::DarkCyan,
        Color::Gray => CColor::Grey,
        Color::DarkGray => CColor::DarkGrey,
        Color::LightRed => CColor::Red,
        Color::LightGreen => CColor::Green,
        Color::LightYellow => CColor::Yellow,
        Color::LightBlue => CColor::Blue,
        Color::LightMagenta => CColor::Magenta,
        Color::LightCyan => CColor::Cyan,
        Color::White => CColor::White,
        Color::Rgb(r, g, b) => CColor::Rgb { r, g, b },
        Color::Indexed(i) => CColor::AnsiValue(i),
    }
}
