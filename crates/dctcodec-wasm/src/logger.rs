//! Forward `log` records from the core crate to the JavaScript console.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format!("[{}] {}", record.target(), record.args());
        emit(record.level(), &message);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, message: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let message = JsValue::from_str(message);
    match level {
        Level::Error => console::error_1(&message),
        Level::Warn => console::warn_1(&message),
        Level::Info => console::info_1(&message),
        Level::Debug | Level::Trace => console::debug_1(&message),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: Level, message: &str) {
    eprintln!("{:<5} {}", level, message);
}

/// Install the console logger with the given maximum level.
///
/// Calling this more than once keeps the first logger and only updates the
/// level filter.
pub fn init(level: LevelFilter) {
    // Err means a logger is already installed
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
