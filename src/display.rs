//! Terminal output for newly discovered records.
//!
//! [`Printer`] is the default [`Handler`]: one line per record with its title
//! and UTC creation time.

use std::io::{self, IsTerminal, Stdout, Write};

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;

use crate::watch::{Handler, HandlerError, NewsRecord};

/// Output format for record timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an epoch-seconds string as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// Returns `None` if the value is not an integer or is out of range.
#[must_use]
pub fn format_timestamp(create_time: &str) -> Option<String> {
    let secs: i64 = create_time.trim().parse().ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.format(TIMESTAMP_FORMAT).to_string())
}

/// Writes `"{title} - {timestamp}"` per record.
///
/// By default an unparseable `create_time` is an error, which stops the
/// watch loop. [`lenient`](Self::lenient) prints the raw value instead.
#[derive(Debug)]
pub struct Printer<W: Write = Stdout> {
    out: W,
    lenient: bool,
    colored: bool,
}

impl Printer<Stdout> {
    /// Printer for standard output, coloured only when stdout is a terminal.
    #[must_use]
    pub fn stdout() -> Self {
        let out = io::stdout();
        let colored = out.is_terminal();
        Self::new(out).colored(colored)
    }
}

impl<W: Write> Printer<W> {
    /// Plain printer writing to `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self {
            out,
            lenient: false,
            colored: false,
        }
    }

    /// Print the raw `create_time` instead of failing on bad timestamps.
    #[must_use]
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Colour the title and timestamp.
    #[must_use]
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Whether output is coloured.
    #[must_use]
    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// Get the underlying writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the printer, returning the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_record<R: NewsRecord>(&mut self, record: &R) -> Result<(), HandlerError> {
        let timestamp = match format_timestamp(record.create_time()) {
            Some(ts) => ts,
            None if self.lenient => {
                tracing::warn!(
                    link = %record.link(),
                    create_time = %record.create_time(),
                    "Unparseable create_time, printing raw value"
                );
                record.create_time().to_string()
            }
            None => {
                return Err(HandlerError::InvalidTimestamp {
                    link: record.link().to_string(),
                    value: record.create_time().to_string(),
                });
            }
        };

        if self.colored {
            writeln!(self.out, "{} - {}", record.title().bold(), timestamp.dimmed())?;
        } else {
            writeln!(self.out, "{} - {}", record.title(), timestamp)?;
        }
        Ok(())
    }
}

impl<R: NewsRecord, W: Write> Handler<R> for Printer<W> {
    fn handle(&mut self, records: &[R]) -> Result<(), HandlerError> {
        let result = records.iter().try_for_each(|r| self.print_record(r));
        self.out.flush()?;
        result
    }
}
