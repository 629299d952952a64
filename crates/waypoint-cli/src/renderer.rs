//! Terminal rendering of the markdown produced by the display wrappers.
//!
//! Rich output goes through termimad with headers and status lines colored
//! by hand; plain output prints the markdown unchanged.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// How a single line is styled in rich mode.
#[derive(Debug, PartialEq, Eq)]
enum LineStyle {
    Header,
    Success,
    Failure,
    Inline,
}

fn classify(line: &str) -> LineStyle {
    if line.starts_with('#') {
        LineStyle::Header
    } else if line.starts_with("Success:") {
        LineStyle::Success
    } else if line.starts_with("Error:") {
        LineStyle::Failure
    } else {
        LineStyle::Inline
    }
}

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match classify(line) {
                LineStyle::Header => println!("\x1b[34m{line}\x1b[0m"),
                LineStyle::Success => println!("\x1b[32m{line}\x1b[0m"),
                LineStyle::Failure => println!("\x1b[31m{line}\x1b[0m"),
                LineStyle::Inline => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
