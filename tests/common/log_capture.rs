/*!
 * Global logger that records every log line per test thread
 *
 * Lines are also forwarded to env_logger so `RUST_LOG` output still works.
 */

use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

/// One recorded log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub level: Level,
    pub target: String,
    pub message: String,
}

struct CapturingLogger {
    inner: env_logger::Logger,
    lines: Mutex<Vec<(ThreadId, CapturedLine)>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let line = CapturedLine {
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((thread::current().id(), line));
        }
        self.inner.log(record);
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static LOGGER: Lazy<CapturingLogger> = Lazy::new(|| CapturingLogger {
    inner: env_logger::Builder::from_default_env().is_test(true).build(),
    lines: Mutex::new(Vec::new()),
});

/// Install the logger; later calls are no-ops
pub fn init() {
    if log::set_logger(&*LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Lines logged so far by the calling test's thread
pub fn captured_lines() -> Vec<CapturedLine> {
    let current = thread::current().id();
    LOGGER
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|(thread, _)| *thread == current)
        .map(|(_, line)| line.clone())
        .collect()
}

/// Messages logged by the calling test's thread that start with `prefix`
pub fn messages_starting_with(prefix: &str) -> Vec<String> {
    captured_lines()
        .into_iter()
        .filter(|line| line.message.starts_with(prefix))
        .map(|line| line.message)
        .collect()
}
