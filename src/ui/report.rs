//! Profile report rendering
//!
//! Lays out one profile as a stack of ratatui widgets: a header panel with
//! name and occupation, info rows, a summary panel and the experience table.
//! Everything is drawn into off-screen [`Buffer`]s sized to fit their content,
//! which the caller then writes to the terminal in order.
//!
//! A single buffer holds at most `u16::MAX` cells, so tall content is split
//! across several buffers. Bordered panels that are split keep their side
//! borders on every piece and their title on the first one.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::data::Profile;

/// Labels of the info rows, right-aligned in a shared column
const HEADLINE_LABEL: &str = "Headline:";
const LOCATION_LABEL: &str = "Localização:";

/// Experience table column titles
const TABLE_HEADERS: [&str; 4] = ["Empresa", "Cargo", "Local", "Período"];

/// Narrowest width the report is laid out for
pub const MIN_WIDTH: u16 = 40;

/// Renders the complete report for one profile
///
/// # Arguments
/// * `profile` - The profile to render
/// * `index` - 1-based position of the profile in the run
/// * `width` - Available terminal columns
pub fn render_profile(profile: &Profile, index: usize, width: u16) -> Vec<Buffer> {
    let width = width.max(MIN_WIDTH);

    let sections = [
        header_panel(profile, index, width),
        info_rows(profile, width),
        summary_panel(profile, width),
        experience_table(profile, width),
    ];

    let mut buffers = Vec::new();
    for (i, section) in sections.into_iter().enumerate() {
        if i > 0 {
            buffers.push(Buffer::empty(Rect::new(0, 0, width, 1)));
        }
        buffers.extend(section);
    }
    buffers
}

/// Renders a horizontal rule with a centered title
pub fn render_rule(title: &str, width: u16) -> Vec<Buffer> {
    let width = width.max(MIN_WIDTH);
    let label = format!(" {} ", title);
    let remaining = (width as usize).saturating_sub(text_width(&label));
    let left = remaining / 2;
    let right = remaining - left;

    let line = Line::from(vec![
        Span::styled("─".repeat(left), Style::default().fg(Color::Green)),
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("─".repeat(right), Style::default().fg(Color::Green)),
    ]);

    lines_buffers(vec![line], width)
}

/// Renders a wrapped single-style message
pub fn render_message(message: &str, style: Style, width: u16) -> Vec<Buffer> {
    let width = width.max(MIN_WIDTH);
    let lines = wrap_text(message, width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, style)))
        .collect();

    lines_buffers(lines, width)
}

/// Bordered panel with the name and occupation, sized to its content
fn header_panel(profile: &Profile, index: usize, width: u16) -> Vec<Buffer> {
    let title = format!(" Perfil {} ", index);
    let inner = (width as usize).saturating_sub(4);

    let name = truncate(&profile.name, inner);
    let occupation = truncate(&profile.occupation, inner);
    let content_width = text_width(&name)
        .max(text_width(&occupation))
        .max(text_width(&title));

    let text = Text::from(vec![
        Line::from(Span::styled(
            name,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            occupation,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let area = Rect::new(0, 0, width, 4);
    let mut buffer = Buffer::empty(area);
    let panel = Rect {
        width: (content_width as u16 + 4).min(width),
        ..area
    };
    Paragraph::new(text).block(block).render(panel, &mut buffer);

    vec![buffer]
}

/// Headline and location rows with right-aligned labels
fn info_rows(profile: &Profile, width: u16) -> Vec<Buffer> {
    let label_width = text_width(HEADLINE_LABEL).max(text_width(LOCATION_LABEL));
    let value_width = (width as usize).saturating_sub(label_width + 1);
    let label_style = Style::default().fg(Color::Cyan);

    let mut lines = Vec::new();
    for (label, value) in [
        (HEADLINE_LABEL, &profile.headline),
        (LOCATION_LABEL, &profile.location),
    ] {
        for (i, chunk) in wrap_text(value, value_width).into_iter().enumerate() {
            let prefix = if i == 0 {
                format!("{:>w$} ", label, w = label_width)
            } else {
                " ".repeat(label_width + 1)
            };
            lines.push(Line::from(vec![
                Span::styled(prefix, label_style),
                Span::raw(chunk),
            ]));
        }
    }

    lines_buffers(lines, width)
}

/// Bordered summary panel with the text wrapped to the panel width
fn summary_panel(profile: &Profile, width: u16) -> Vec<Buffer> {
    let inner = (width as usize).saturating_sub(2);
    let lines: Vec<Line> = wrap_text(&profile.summary, inner)
        .into_iter()
        .map(Line::from)
        .collect();

    let pieces = split_pieces(lines, |_| 1, max_rows(width) - 2);
    let count = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            let borders = piece_borders(i, count);
            let height = piece.len() as u16 + border_rows(borders);

            let mut block = Block::default()
                .borders(borders)
                .border_style(Style::default().fg(Color::Green));
            if i == 0 {
                block = block.title(" Resumo ");
            }

            draw(Paragraph::new(piece).block(block), width, height)
        })
        .collect()
}

/// Bordered experience table, one row per entry in provider order
///
/// Cells wrap within their column, so a row may span several lines.
fn experience_table(profile: &Profile, width: u16) -> Vec<Buffer> {
    let widths = column_widths(profile, width);
    let cell_style = Style::default().fg(Color::Green);
    let company_style = cell_style.add_modifier(Modifier::BOLD);
    // Room for both borders and the header in every piece
    let budget = max_rows(width) - 3;

    let rows: Vec<(Row<'static>, usize)> = profile
        .experiences
        .iter()
        .map(|entry| {
            let columns = [
                (&entry.company, company_style),
                (&entry.title, cell_style),
                (&entry.location, cell_style),
                (&entry.period, cell_style),
            ];
            let cells: Vec<(Vec<String>, Style)> = columns
                .iter()
                .zip(widths.iter())
                .map(|((value, style), w)| {
                    let mut lines = wrap_text(value, *w as usize);
                    lines.truncate(budget);
                    (lines, *style)
                })
                .collect();
            let row_height = cells.iter().map(|(l, _)| l.len()).max().unwrap_or(1);

            let row = Row::new(cells.into_iter().map(|(lines, style)| {
                Cell::from(Text::from(
                    lines.into_iter().map(Line::from).collect::<Vec<_>>(),
                ))
                .style(style)
            }))
            .height(row_height as u16);
            (row, row_height)
        })
        .collect();

    let pieces = split_pieces(rows, |(_, height)| *height, budget);
    let count = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| {
            let borders = piece_borders(i, count);
            let mut height =
                border_rows(borders) + piece.iter().map(|(_, h)| *h as u16).sum::<u16>();

            let mut block = Block::default()
                .borders(borders)
                .border_style(Style::default().fg(Color::Green));
            let mut table = Table::new(
                piece.into_iter().map(|(row, _)| row),
                widths.map(Constraint::Length),
            )
            .column_spacing(1);

            if i == 0 {
                block = block
                    .title(" Experiências Profissionais ")
                    .title_alignment(Alignment::Center);
                table = table.header(table_header());
                height += 1;
            }

            draw(table.block(block), width, height)
        })
        .collect()
}

fn table_header() -> Row<'static> {
    Row::new(TABLE_HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

/// Splits the table's inner width between the four columns
///
/// The period column is sized to its longest value; the rest is shared
/// 3:3:2 between company, title and location.
fn column_widths(profile: &Profile, width: u16) -> [u16; 4] {
    let inner = (width as usize).saturating_sub(2);
    let spacing = TABLE_HEADERS.len() - 1;

    let period = profile
        .experiences
        .iter()
        .map(|e| text_width(&e.period))
        .chain(std::iter::once(text_width(TABLE_HEADERS[3])))
        .max()
        .unwrap_or(0)
        .min(inner / 3);

    let available = inner.saturating_sub(spacing + period);
    let company = available * 3 / 8;
    let title = available * 3 / 8;
    let location = available - company - title;

    [company as u16, title as u16, location as u16, period as u16]
}

/// Most rows a single buffer of `width` columns can hold
///
/// ratatui shrinks any area of more than `u16::MAX` cells.
fn max_rows(width: u16) -> usize {
    (u16::MAX / width.max(1)) as usize
}

/// Groups items in order into pieces whose heights add up to at most `budget`
///
/// An item taller than `budget` gets a piece of its own. The result always
/// has at least one piece, which is empty for no items.
fn split_pieces<T>(items: Vec<T>, height: impl Fn(&T) -> usize, budget: usize) -> Vec<Vec<T>> {
    let mut pieces = Vec::new();
    let mut current = Vec::new();
    let mut used = 0;

    for item in items {
        let h = height(&item);
        if !current.is_empty() && used + h > budget {
            pieces.push(std::mem::take(&mut current));
            used = 0;
        }
        used += h;
        current.push(item);
    }

    pieces.push(current);
    pieces
}

/// Borders of piece `i` out of `count` pieces of one panel
fn piece_borders(i: usize, count: usize) -> Borders {
    let mut borders = Borders::LEFT | Borders::RIGHT;
    if i == 0 {
        borders |= Borders::TOP;
    }
    if i + 1 == count {
        borders |= Borders::BOTTOM;
    }
    borders
}

fn border_rows(borders: Borders) -> u16 {
    u16::from(borders.contains(Borders::TOP)) + u16::from(borders.contains(Borders::BOTTOM))
}

/// Draws a widget into a fresh buffer of exactly `width` by `height`
fn draw<W: Widget>(widget: W, width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);
    buffer
}

/// Draws plain lines into as few buffers as their height allows
fn lines_buffers(lines: Vec<Line<'static>>, width: u16) -> Vec<Buffer> {
    split_pieces(lines, |_| 1, max_rows(width))
        .into_iter()
        .map(|piece| {
            let height = piece.len() as u16;
            draw(Paragraph::new(piece), width, height)
        })
        .collect()
}

/// Display width of a string in terminal columns
fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Cuts a string to at most `max` columns, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if text_width(s) <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Greedy word wrap to `width` columns
///
/// Explicit newlines are kept, words longer than a line are split, and the
/// result always has at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let word: String = word.into_iter().collect();
            let needed = if current.is_empty() {
                text_width(&word)
            } else {
                text_width(&current) + 1 + text_width(&word)
            };

            if needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
