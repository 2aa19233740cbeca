//! Process-wide log-callback registry.
//!
//! The only process-wide mutable state in the core (see DESIGN.md "Global
//! state"). Lifecycle is register -> unregister, with no implicit teardown.
//! Safe to call from worker threads. Internally this also forwards to the
//! `log` crate facade so a caller that never registers a subscriber still
//! sees diagnostics through whatever subscriber they've wired up themselves.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

pub type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync>;

struct Subscriber {
    handle: u64,
    callback: LogCallback,
}

static SUBSCRIBERS: Lazy<RwLock<Vec<Subscriber>>> = Lazy::new(|| RwLock::new(Vec::new()));
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Registers a log callback and returns a handle usable with [`unregister`].
pub fn register(callback: LogCallback) -> u64 {
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    SUBSCRIBERS.write().unwrap().push(Subscriber { handle, callback });
    handle
}

/// Removes a previously registered callback. No-op if `handle` is unknown.
pub fn unregister(handle: u64) {
    SUBSCRIBERS.write().unwrap().retain(|s| s.handle != handle);
}

pub fn emit(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => log::debug!("{message}"),
        LogLevel::Info => log::info!("{message}"),
        LogLevel::Warn => log::warn!("{message}"),
        LogLevel::Error => log::error!("{message}"),
    }
    let subs = SUBSCRIBERS.read().unwrap();
    for sub in subs.iter() {
        (sub.callback)(level, message);
    }
}

macro_rules! anomaly {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::LogLevel::Warn, &format!($($arg)*))
    };
}

pub(crate) use anomaly;
