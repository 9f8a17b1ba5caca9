//! JSONL file logger for profiling events.

use std::fs::{File, OpenOptions, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;

use super::event::{EventType, ProfileEvent};
use crate::paths;

/// Set by init(); events logged before that are dropped.
static LOGGER: Mutex<Option<ProfileLogger>> = Mutex::new(None);

static EVENT_COUNT: AtomicU64 = AtomicU64::new(0);

/// Events between forced flushes
const FLUSH_EVERY: u64 = 100;

pub struct ProfileLogger {
    writer: BufWriter<File>,
    session_id: String,
}

impl ProfileLogger {
    /// Open `profile_<timestamp>.jsonl` under the profile directory.
    fn new() -> std::io::Result<Self> {
        let session_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let dir = paths::profile_dir();
        create_dir_all(&dir)?;
        let path = Path::new(&dir).join(format!("profile_{}.jsonl", session_id));

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::info!("Profiling enabled: writing to {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            session_id,
        })
    }

    fn log(&mut self, event: &ProfileEvent) {
        match serde_json::to_string(event) {
            Ok(json) => {
                let _ = writeln!(self.writer, "{}", json);
                let count = EVENT_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
                if count % FLUSH_EVERY == 0 {
                    let _ = self.writer.flush();
                }
            }
            Err(e) => tracing::warn!("Unserializable profile event: {}", e),
        }
    }
}

/// The logger slot. A panic while logging must not disable profiling for
/// the rest of the process, so poisoning is ignored.
fn slot() -> MutexGuard<'static, Option<ProfileLogger>> {
    LOGGER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write(event: ProfileEvent) {
    if let Some(logger) = slot().as_mut() {
        logger.log(&event);
    }
}

/// Start a profiling session. Call once from main().
pub fn init() {
    let session_id = {
        let mut guard = slot();
        if guard.is_some() {
            tracing::warn!("Profiler already initialized");
            return;
        }
        match ProfileLogger::new() {
            Ok(logger) => {
                let id = logger.session_id.clone();
                *guard = Some(logger);
                id
            }
            Err(e) => {
                tracing::error!("Failed to initialize profiler: {}", e);
                return;
            }
        }
    };
    log_event(EventType::SessionStart { session_id });
}

/// End the session and flush buffered events.
pub fn shutdown() {
    let total_events = EVENT_COUNT.load(Ordering::Relaxed);
    log_event(EventType::SessionEnd { total_events });

    if let Some(mut logger) = slot().take() {
        let _ = logger.writer.flush();
        tracing::info!("Profiling session ended: {} events logged", total_events);
    }
}

pub fn log_event(event_type: EventType) {
    write(ProfileEvent::new(event_type));
}

pub fn log_timed(name: &str, duration: Duration) {
    write(ProfileEvent::with_duration(
        EventType::TimedScope {
            name: name.to_string(),
        },
        duration,
    ));
}
