use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::utils::Color;


// ----------------------------------------------
// Log Levels
// ----------------------------------------------

#[repr(u32)]
#[derive(Copy, Clone, Debug, Display, EnumIter, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Silent,
    Verbose,
    Info,
    Warn,
    Error,
}

impl Level {
    // A minimum level of Silent disables all output.
    #[inline]
    pub fn is_enabled(self) -> bool {
        let min_level = MIN_LOG_LEVEL.load(Ordering::Relaxed);
        min_level != Self::Silent as u32 && (self as u32) >= min_level
    }

    // Used by the editor status bar.
    pub fn color(self) -> Color {
        match self {
            Self::Silent  => Color::white(),
            Self::Verbose => Color::gray(),
            Self::Info    => Color::green(),
            Self::Warn    => Color::yellow(),
            Self::Error   => Color::red(),
        }
    }

    fn ansi_code(self) -> &'static str {
        match self {
            Self::Silent  => "",
            Self::Verbose => "\x1b[90m",
            Self::Info    => "\x1b[32m",
            Self::Warn    => "\x1b[33m",
            Self::Error   => "\x1b[31m",
        }
    }
}

// ----------------------------------------------
// LogConfig
// ----------------------------------------------

// Part of the editor config file, applied once at startup with `configure()`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: Level,
    pub source_location: bool,
    pub tty_colors: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: Level::Verbose, source_location: false, tty_colors: true }
    }
}

static MIN_LOG_LEVEL: AtomicU32 = AtomicU32::new(Level::Verbose as u32);
static ENABLE_SRC_LOCATION: AtomicBool = AtomicBool::new(false);
static ENABLE_TTY_COLORS: AtomicBool = AtomicBool::new(true);

pub fn configure(config: &LogConfig) {
    MIN_LOG_LEVEL.store(config.level as u32, Ordering::Relaxed);
    ENABLE_SRC_LOCATION.store(config.source_location, Ordering::Relaxed);
    ENABLE_TTY_COLORS.store(config.tty_colors, Ordering::Relaxed);
}

// ----------------------------------------------
// Channel / Record
// ----------------------------------------------

// Subsystem a message comes from: "grid", "catalog", "level", etc.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Channel {
    pub name: &'static str,
}

#[derive(Copy, Clone, Debug)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
    pub module: &'static str,
}

#[derive(Clone, Debug)]
pub struct Record {
    pub level: Level,
    pub channel: Channel,
    pub location: Location,
    pub message: String,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colored = ENABLE_TTY_COLORS.load(Ordering::Relaxed) && self.level != Level::Silent;
        let (start, end) = if colored { (self.level.ansi_code(), "\x1b[0m") } else { ("", "") };

        write!(f, "{start}[{:?}] [{}]{end} ", self.level, self.channel.name)?;

        if ENABLE_SRC_LOCATION.load(Ordering::Relaxed) {
            write!(f, "{}:{} {} - ", self.location.file, self.location.line, self.location.module)?;
        }

        f.write_str(&self.message)
    }
}

// ----------------------------------------------
// Listener
// ----------------------------------------------

struct Listener {
    min_level: Level,
    callback: Box<dyn Fn(&Record) + Send + Sync>,
}

static LISTENER: OnceLock<Listener> = OnceLock::new();

// Installs the single global listener, which receives every printed record
// at `min_level` or above. Returns false if one was already installed.
pub fn set_listener<F>(min_level: Level, callback: F) -> bool
    where F: Fn(&Record) + Send + Sync + 'static
{
    LISTENER.set(Listener { min_level, callback: Box::new(callback) }).is_ok()
}

// ----------------------------------------------
// Macros
// ----------------------------------------------

pub fn emit(level: Level, channel: &'static str, location: Location, args: fmt::Arguments) {
    if !level.is_enabled() {
        return;
    }

    let record = Record {
        level,
        channel: Channel { name: channel },
        location,
        message: args.to_string(),
    };

    // Write failures are dropped; logging never fails the caller.
    let _ = writeln!(std::io::stdout().lock(), "{record}");

    if let Some(listener) = LISTENER.get() {
        if level >= listener.min_level {
            (listener.callback)(&record);
        }
    }
}

// Usage: `log::warn!("grid", "bad cell {index}")`.
#[macro_export]
macro_rules! log_at {
    ($level:ident, $chan:literal, $($arg:tt)+) => {
        $crate::log::emit(
            $crate::log::Level::$level,
            $chan,
            $crate::log::Location { file: file!(), line: line!(), module: module_path!() },
            format_args!($($arg)+),
        )
    };
}

#[macro_export]
macro_rules! verbose {
    ($chan:literal, $($arg:tt)+) => { $crate::log_at!(Verbose, $chan, $($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($chan:literal, $($arg:tt)+) => { $crate::log_at!(Info, $chan, $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($chan:literal, $($arg:tt)+) => { $crate::log_at!(Warn, $chan, $($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($chan:literal, $($arg:tt)+) => { $crate::log_at!(Error, $chan, $($arg)+) };
}

// Scoped usage: log::info!(), log::warn!(), etc.
#[allow(unused_imports)]
pub use crate::{verbose, info, warn, error};
