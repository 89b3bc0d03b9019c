use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use duewatch_shared::countdown::Tone;
use duewatch_shared::{Task, TaskCard};
use unicode_width::UnicodeWidthStr;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color_requested: bool) -> Self {
        Self {
            color: color_requested && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, tasks, now, tz))]
    pub fn print_dashboard(
        &mut self,
        tasks: &[Task],
        now: DateTime<Utc>,
        tz: &Tz,
        redraw: bool,
    ) -> anyhow::Result<()> {
        let cards = tasks
            .iter()
            .map(|task| TaskCard::build(task, now, tz))
            .collect::<Vec<_>>();

        let mut out = io::stdout().lock();
        if redraw && self.color {
            write!(out, "{CLEAR_SCREEN}")?;
        }
        self.write_cards(&mut out, &cards)?;
        out.flush()?;
        Ok(())
    }

    pub fn write_cards<W: Write>(&self, mut out: W, cards: &[TaskCard]) -> anyhow::Result<()> {
        if cards.is_empty() {
            writeln!(out, "No pending tasks.")?;
            return Ok(());
        }

        let gutter = cards
            .iter()
            .map(|card| UnicodeWidthStr::width(card.urgency.as_str()))
            .max()
            .unwrap_or(0);
        let indent = " ".repeat(gutter + 2);

        for card in cards {
            let padding = gutter.saturating_sub(UnicodeWidthStr::width(card.urgency.as_str()));
            writeln!(
                out,
                "{}{}  {}",
                " ".repeat(padding),
                self.paint(&card.urgency, "33"),
                card.description
            )?;

            let mut meta = Vec::new();
            if !card.project.is_empty() {
                meta.push(format!("project:{}", card.project));
            }
            meta.push(format!("status:{}", card.status));
            if let Some(priority) = card.priority {
                meta.push(format!("priority:{priority}"));
            }
            writeln!(out, "{indent}{}", meta.join("  "))?;

            if let Some(due) = &card.due_label {
                writeln!(out, "{indent}due {due}")?;
            }

            if let Some(countdown) = &card.countdown {
                let line = format!("{} {}", countdown.title, countdown.text);
                writeln!(out, "{indent}{}", self.paint(&line, tone_code(countdown.tone)))?;
            }

            writeln!(out)?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn tone_code(tone: Tone) -> &'static str {
    match tone {
        Tone::Good => "32",
        Tone::Neutral => "33",
        Tone::Bad => "31",
    }
}
