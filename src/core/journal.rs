//! Scheduler event records and the sinks that keep them.
//!
//! Every lifecycle transition the scheduler drives becomes a
//! [`SchedulerEvent`]. Events go to listener callbacks and, optionally, to a
//! journal: `JsonlJournal` appends one JSON object per line to a file such as
//! `scheduler.events.jsonl`; `MemoryJournal` keeps a bounded backlog.

use crate::core::command::CommandId;
use crate::core::error::CommandeerError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use ulid::Ulid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Initialized,
    Executed,
    Finished,
    Interrupted,
    Rejected,
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Initialized => "initialized",
            EventKind::Executed => "executed",
            EventKind::Finished => "finished",
            EventKind::Interrupted => "interrupted",
            EventKind::Rejected => "rejected",
        }
    }
}

/// Why a command ended early, or why a schedule request was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterruptCause {
    Canceled,
    /// Another command needed a subsystem. For `Rejected` events `by` is the
    /// incumbent that kept it.
    Conflict { by: CommandId, by_name: String },
    Disabled,
    Unregistered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerEvent {
    pub ts: String,
    pub event_id: String,
    pub tick: u64,
    pub time_ms: u64,
    pub kind: EventKind,
    pub command_id: CommandId,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<InterruptCause>,
}

impl SchedulerEvent {
    pub fn new(
        tick: u64,
        time_ms: u64,
        kind: EventKind,
        command_id: CommandId,
        command: &str,
        cause: Option<InterruptCause>,
    ) -> Self {
        Self {
            ts: now_epoch_z(),
            event_id: Ulid::new().to_string(),
            tick,
            time_ms,
            kind,
            command_id,
            command: command.to_string(),
            cause,
        }
    }
}

/// Unix-epoch seconds with a `Z` suffix, e.g. `1771220592Z`.
pub fn now_epoch_z() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("{}Z", secs)
}

pub trait EventSink {
    fn record(&mut self, event: &SchedulerEvent) -> Result<(), CommandeerError>;
}

/// Append-only JSON-lines journal.
pub struct JsonlJournal {
    path: PathBuf,
    file: File,
}

impl JsonlJournal {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CommandeerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(CommandeerError::IoError)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(CommandeerError::IoError)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonlJournal {
    fn record(&mut self, event: &SchedulerEvent) -> Result<(), CommandeerError> {
        let line = serde_json::to_string(event)?;
        writeln!(self.file, "{}", line).map_err(CommandeerError::IoError)?;
        Ok(())
    }
}

/// Read a JSONL journal back, e.g. for replay or assertions.
pub fn read_journal(path: &Path) -> Result<Vec<SchedulerEvent>, CommandeerError> {
    let raw = std::fs::read_to_string(path).map_err(CommandeerError::IoError)?;
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(CommandeerError::JsonError))
        .collect()
}

/// Bounded in-memory journal. Clones share the same backlog.
#[derive(Debug, Clone)]
pub struct MemoryJournal {
    capacity: usize,
    backlog: Rc<RefCell<VecDeque<SchedulerEvent>>>,
}

impl MemoryJournal {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            backlog: Rc::new(RefCell::new(VecDeque::with_capacity(capacity.max(1)))),
        }
    }

    pub fn snapshot(&self) -> Vec<SchedulerEvent> {
        self.backlog.borrow().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.backlog.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.backlog.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.backlog.borrow_mut().clear();
    }
}

impl EventSink for MemoryJournal {
    fn record(&mut self, event: &SchedulerEvent) -> Result<(), CommandeerError> {
        let mut backlog = self.backlog.borrow_mut();
        if backlog.len() == self.capacity {
            backlog.pop_front();
        }
        backlog.push_back(event.clone());
        Ok(())
    }
}
