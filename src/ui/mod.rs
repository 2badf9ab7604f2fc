//! UI rendering module
//!
//! Contains the report layout and the console that writes it out.

pub mod output;
pub mod report;

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use ratatui::style::{Color, Modifier, Style};

use crate::data::Profile;

pub use output::{buffer_lines, write_buffer, write_buffers};
pub use report::{render_message, render_profile, render_rule, wrap_text};

/// Width used when the terminal size cannot be determined
pub const DEFAULT_WIDTH: u16 = 100;

/// Widest layout, so reports stay readable on very wide terminals
pub const MAX_WIDTH: u16 = 140;

/// How profiles are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Formatted report
    Text,
    /// One JSON object per line
    Json,
}

/// Writes run output to a stream
pub struct Console<W: Write> {
    out: W,
    format: OutputFormat,
    width: u16,
    styled: bool,
}

impl Console<io::Stdout> {
    /// Creates a console on stdout
    ///
    /// Styling is only used when stdout is a terminal and `color` is true.
    pub fn stdout(format: OutputFormat, color: bool) -> Self {
        let stdout = io::stdout();
        let styled = color && stdout.is_terminal();
        Self::new(stdout, format, terminal_width(), styled)
    }
}

impl<W: Write> Console<W> {
    /// Creates a console on any stream
    pub fn new(out: W, format: OutputFormat, width: u16, styled: bool) -> Self {
        Self {
            out,
            format,
            width,
            styled,
        }
    }

    /// Announces which store file is in use
    pub fn cache_notice(&mut self, path: &Path) -> io::Result<()> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }
        let buffers = render_message(
            &format!("Usando cache em: {}", path.display()),
            Style::default().add_modifier(Modifier::BOLD),
            self.width,
        );
        write_buffers(&mut self.out, &buffers, self.styled)?;
        writeln!(self.out)
    }

    /// Marks the start of a profile
    pub fn rule(&mut self, index: usize) -> io::Result<()> {
        if self.format != OutputFormat::Text {
            return Ok(());
        }
        let buffers = render_rule(&format!("Processando perfil {}", index), self.width);
        write_buffers(&mut self.out, &buffers, self.styled)
    }

    /// Writes one profile in the configured format
    pub fn profile(&mut self, profile: &Profile, index: usize) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let buffers = render_profile(profile, index, self.width);
                write_buffers(&mut self.out, &buffers, self.styled)?;
                writeln!(self.out)
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, profile)?;
                writeln!(self.out)?;
                self.out.flush()
            }
        }
    }

    /// Reports a failed profile
    ///
    /// JSON output keeps stdout machine-readable, so there the failure goes
    /// to stderr as a plain line instead.
    pub fn error(&mut self, index: usize, error: &dyn std::fmt::Display) -> io::Result<()> {
        let message = format!("Erro no perfil {}: {}", index, error);
        if self.format != OutputFormat::Text {
            eprintln!("{}", message);
            return Ok(());
        }
        let buffers = render_message(
            &message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            self.width,
        );
        write_buffers(&mut self.out, &buffers, self.styled)?;
        writeln!(self.out)
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// Current terminal width, clamped to the supported range
pub fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(width, _)| width)
        .unwrap_or(DEFAULT_WIDTH)
        .clamp(report::MIN_WIDTH, MAX_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExperienceEntry;

    fn create_test_profile() -> Profile {
        Profile {
            name: "Alice A".to_string(),
            occupation: "N/A".to_string(),
            headline: "N/A".to_string(),
            summary: "N/A".to_string(),
            location: "N/A, N/A, N/A".to_string(),
            experiences: vec![ExperienceEntry {
                company: "Acme".to_string(),
                title: "Eng".to_string(),
                location: "N/A".to_string(),
                period: "1/2020 - Atualmente".to_string(),
            }],
        }
    }

    fn output(console: Console<Vec<u8>>) -> String {
        String::from_utf8(console.into_inner()).expect("valid utf-8")
    }

    #[test]
    fn test_text_console_writes_report() {
        let mut console = Console::new(Vec::new(), OutputFormat::Text, 80, false);

        console.cache_notice(Path::new("/tmp/linkedin_cache.json")).unwrap();
        console.rule(1).unwrap();
        console.profile(&create_test_profile(), 1).unwrap();

        let text = output(console);
        assert!(text.starts_with("Usando cache em: /tmp/linkedin_cache.json"));
        assert!(text.contains("Processando perfil 1"));
        assert!(text.contains("1/2020 - Atualmente"));
    }

    #[test]
    fn test_json_console_writes_one_object_per_line() {
        let mut console = Console::new(Vec::new(), OutputFormat::Json, 80, false);

        console.cache_notice(Path::new("cache.json")).unwrap();
        console.rule(1).unwrap();
        console.profile(&create_test_profile(), 1).unwrap();
        console.profile(&create_test_profile(), 2).unwrap();
        console.error(3, &"boom").unwrap();

        let text = output(console);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let json: serde_json::Value = serde_json::from_str(lines[0]).expect("valid JSON");
        assert_eq!(json["nome"], "Alice A");
        assert_eq!(json["experiencias"][0]["periodo"], "1/2020 - Atualmente");
    }

    #[test]
    fn test_text_console_writes_long_error_in_full() {
        let mut console = Console::new(Vec::new(), OutputFormat::Text, 100, false);
        let detail = "word ".repeat(20000);

        console.error(1, &detail).unwrap();

        let text = output(console);
        assert!(text.starts_with("Erro no perfil 1: word"));
        assert_eq!(text.matches("word").count(), 20000);
    }

    #[test]
    fn test_text_console_reports_errors() {
        let mut console = Console::new(Vec::new(), OutputFormat::Text, 80, false);

        console.error(2, &"Provider returned 401 Unauthorized").unwrap();

        assert!(output(console).contains("Erro no perfil 2: Provider returned 401 Unauthorized"));
    }
}
