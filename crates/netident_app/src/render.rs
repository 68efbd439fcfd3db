use std::io::{self, Write};

use colored::{ColoredString, Colorize};
use netident_core::{AppViewModel, CopyAffordance, FieldView, Visual};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Heading,
    Plain,
    Muted,
    Notice,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub text: String,
    pub tone: Tone,
}

impl RenderedLine {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn paint(&self) -> ColoredString {
        match self.tone {
            Tone::Heading => self.text.as_str().bold(),
            Tone::Plain => self.text.as_str().normal(),
            Tone::Muted => self.text.as_str().dimmed(),
            Tone::Notice => self.text.as_str().yellow(),
            Tone::Error => self.text.as_str().red(),
        }
    }
}

/// Lays the view out as report lines. A blocked session shows only the
/// compatibility notice.
pub fn render(view: &AppViewModel) -> Vec<RenderedLine> {
    if let Some(notice) = &view.notice {
        let mut lines = vec![RenderedLine::new(notice.heading.as_str(), Tone::Heading)];
        lines.extend(
            notice
                .lines
                .iter()
                .map(|line| RenderedLine::new(line.as_str(), Tone::Plain)),
        );
        lines.push(RenderedLine::new(notice.detected.as_str(), Tone::Muted));
        return lines;
    }
    view.fields.iter().map(render_field).collect()
}

fn render_field(field: &FieldView) -> RenderedLine {
    let marker = match field.copy {
        CopyAffordance::Disabled => "",
        CopyAffordance::Ready => "  [copy]",
        CopyAffordance::Copied => "  [copied]",
    };
    let tone = match field.visual {
        Visual::Idle | Visual::Loading => Tone::Muted,
        Visual::Settled => Tone::Plain,
        Visual::Informational => Tone::Notice,
        Visual::Error => Tone::Error,
    };
    RenderedLine::new(format!("{}{}", field.text, marker), tone)
}

/// Writes the report to stdout. On a terminal each redraw replaces the
/// previous one in place.
pub struct TerminalReport {
    live: bool,
    drawn: usize,
}

impl TerminalReport {
    pub fn new(live: bool) -> Self {
        Self { live, drawn: 0 }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn draw(&mut self, lines: &[RenderedLine]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        if self.live && self.drawn > 0 {
            // Cursor to the start of the first drawn line, then clear below.
            write!(out, "\x1b[{}F\x1b[J", self.drawn)?;
        }
        for line in lines {
            if self.live {
                writeln!(out, "{}", line.paint())?;
            } else {
                writeln!(out, "{}", line.text)?;
            }
        }
        out.flush()?;
        self.drawn = lines.len();
        Ok(())
    }
}
