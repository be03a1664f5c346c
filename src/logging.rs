use std::io::{self, Write};

use anstyle::{AnsiColor, Style};
use chrono::Local;
use log::{Level, LevelFilter, Log};
#[cfg(all(unix, feature = "journald"))]
use systemd_journal_logger::{JournalLog, connected_to_journal};

/// Minimal stderr logger for one-shot runs under cron or a systemd timer.
///
/// Colour handling (terminal detection, NO_COLOR) comes from [`anstream`]. When stderr is
/// connected to the systemd journal and the `journald` feature is on, records are forwarded
/// there instead and timestamps are left to journalctl.
pub struct Logger {
    filter: LevelFilter,
    timestamps: bool,
    #[cfg(all(unix, feature = "journald"))]
    journald: Option<JournalLog>,
}

impl Logger {
    pub fn new(filter: LevelFilter) -> Self {
        // Timestamps are on unless LIVEDNS_LOG_NO_TIMESTAMPS is set to something non-empty.
        let mut timestamps =
            !crate::get_var("LIVEDNS_LOG_NO_TIMESTAMPS").is_ok_and(|v| !v.is_empty());

        #[cfg(all(unix, feature = "journald"))]
        let journald = init_journald().inspect(|_| timestamps = false);

        Self {
            filter,
            timestamps,
            #[cfg(all(unix, feature = "journald"))]
            journald,
        }
    }

    /// Installs this logger as the global [`log`] sink.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let filter = self.filter;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(filter))
    }

    /// Fallible version of [`Log::log`] to enable the use of `?` within.
    fn try_log(&self, record: &log::Record) -> io::Result<()> {
        // Only this crate's own messages; reqwest logs its internals through the same facade.
        if !record.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return Ok(());
        }

        if !self.enabled(record.metadata()) {
            return Ok(());
        }

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            return journald.journal_send(record);
        }

        let mut output = anstream::stderr().lock();

        if self.timestamps {
            write!(output, "{} ", Local::now().format("%b %d %H:%M:%S"))?;
        }

        let (style, tag) = level_style(record.level());
        writeln!(output, "{style}{tag}{style:#} {}", record.args())?;
        output.flush()
    }
}

fn level_style(level: Level) -> (Style, &'static str) {
    match level {
        Level::Error => (Style::new().fg_color(Some(AnsiColor::Red.into())).bold(), "error:"),
        Level::Warn => (Style::new().fg_color(Some(AnsiColor::Yellow.into())).bold(), "warning:"),
        Level::Info => (Style::new().bold(), "info:"),
        Level::Debug => (Style::new(), "debug:"),
        Level::Trace => (Style::new().dimmed(), "trace:"),
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &log::Record) {
        let _ = self.try_log(record);
    }

    fn flush(&self) {
        let _ = anstream::stderr().flush();

        #[cfg(all(unix, feature = "journald"))]
        if let Some(journald) = self.journald.as_ref() {
            <JournalLog as Log>::flush(journald);
        }
    }
}

#[cfg(all(unix, feature = "journald"))]
fn init_journald() -> Option<JournalLog> {
    if !connected_to_journal() {
        return None;
    }

    JournalLog::empty()
        .ok()
        .map(|log| log.with_syslog_identifier(env!("CARGO_PKG_NAME").to_string()))
}
