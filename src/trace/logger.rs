use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::trace::trace::TraceEvent;

/// Appends trace events as JSON lines. Every event is also mirrored to
/// `tracing` at debug level, with or without a file.
pub struct TraceLogger {
    file: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                file: Some(Mutex::new(file)),
            },
            Err(e) => {
                warn!(path, error = %e, "could not open trace file, tracing disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        debug!(
            tick = event.tick,
            mode = %event.mode,
            decision = event.decision.as_deref().unwrap_or(""),
            discovery = event.discovery.as_deref().unwrap_or(""),
            stage = event.stage.as_deref().unwrap_or(""),
            suppressed = event.suppression_reason.as_deref().unwrap_or(""),
            "detection tick"
        );

        if let Some(file) = &self.file {
            if let Err(e) = append_line(file, event) {
                warn!(tick = event.tick, error = %e, "dropped trace event");
            }
        }
    }
}

fn append_line(file: &Mutex<File>, event: &TraceEvent) -> io::Result<()> {
    let mut line = serde_json::to_vec(event)?;
    line.push(b'\n');
    let mut file = file
        .lock()
        .map_err(|_| io::Error::other("trace file lock poisoned"))?;
    file.write_all(&line)
}
