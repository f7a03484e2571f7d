// Copyright (c) 2023 Easton Man
// Copyright (c) 2020 rCore
// Copyright (c) 2023 rCore/AcreOS
//
// Adapted from rCore https://github.com/rcore-os/rCore/blob/13ad2d19058901e6401a978d4e20acf7f5610666/kernel/src/logging.rs
// And AcreOS/modules/axlog/src/lib.rs

use core::fmt;
use core::str::FromStr;

use log::{self, Level, LevelFilter, Log, Metadata, Record};
use spin::Once;

macro_rules! with_color {
    ($color_code:expr, $($arg:tt)*) => {{
        format_args!("\u{1B}[{}m{}\u{1B}[m", $color_code as u8, format_args!($($arg)*))
    }};
}

#[repr(u8)]
#[allow(dead_code)]
enum ColorCode {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Cyan = 36,
    White = 37,
    BrightBlack = 90,
    BrightRed = 91,
    BrightGreen = 92,
    BrightYellow = 93,
    BrightBlue = 94,
    BrightCyan = 96,
}

/// Where formatted lines go, usually the kernel console
pub type ConsoleSink = fn(fmt::Arguments);

static SINK: Once<ConsoleSink> = Once::new();

cfg_if::cfg_if! {
    // See https://doc.rust-lang.org/reference/conditional-compilation.html#debug_assertions
    if #[cfg(debug_assertions)] {
        const LOG_LEVEL: &str = "debug";
    } else {
        const LOG_LEVEL: &str = "error";
    }
}

/// Install `sink` and register the logger. Only the first call has effect.
pub fn init(sink: ConsoleSink) {
    static LOGGER: SimpleLogger = SimpleLogger;
    if SINK.is_completed() {
        return;
    }
    SINK.call_once(|| sink);
    // Someone else may already own the global logger
    if log::set_logger(&LOGGER).is_ok() {
        set_max_level(LOG_LEVEL);
    }
}

pub fn set_max_level(level: &str) {
    let lf = LevelFilter::from_str(level).ok().unwrap_or(LevelFilter::Off);
    log::set_max_level(lf);
}

struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(sink) = SINK.get() else {
            return;
        };
        let level = record.level();
        let line = record.line().unwrap_or(0);
        let target = record.file().unwrap_or("");
        let level_color = match level {
            Level::Error => ColorCode::BrightRed,
            Level::Warn => ColorCode::BrightYellow,
            Level::Info => ColorCode::BrightGreen,
            Level::Debug => ColorCode::BrightCyan,
            Level::Trace => ColorCode::BrightBlack,
        };
        let args_color = match level {
            Level::Error => ColorCode::Red,
            Level::Warn => ColorCode::Yellow,
            Level::Info => ColorCode::Green,
            Level::Debug => ColorCode::Cyan,
            Level::Trace => ColorCode::BrightBlack,
        };
        sink(with_color!(
            ColorCode::White,
            "[{} {} {}\n",
            with_color!(level_color, "{:<5}", level),
            with_color!(ColorCode::BrightBlue, "{:>30}:{:<4}]", target, line),
            with_color!(args_color, "{}", record.args()),
        ));
    }
    fn flush(&self) {}
}
