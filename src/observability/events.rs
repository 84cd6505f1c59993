//! Observability events for tabledb
//!
//! Events are explicit and typed. Only database lifecycle events exist;
//! per-row table operations are not observable.

use std::fmt;

use super::Severity;

/// Observable events in tabledb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Database handle constructed
    DatabaseOpen,
    /// Table created through the database
    TableCreated,
    /// Index created through the database
    IndexCreated,

    // Snapshot save
    SnapshotSaveStart,
    SnapshotSaveComplete,

    // Snapshot load
    SnapshotLoadStart,
    SnapshotLoadComplete,
    /// No snapshot file; database starts empty
    SnapshotMissing,
    /// Snapshot exists but could not be restored
    SnapshotLoadFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DatabaseOpen => "DATABASE_OPEN",
            Event::TableCreated => "TABLE_CREATED",
            Event::IndexCreated => "INDEX_CREATED",
            Event::SnapshotSaveStart => "SNAPSHOT_SAVE_START",
            Event::SnapshotSaveComplete => "SNAPSHOT_SAVE_COMPLETE",
            Event::SnapshotLoadStart => "SNAPSHOT_LOAD_START",
            Event::SnapshotLoadComplete => "SNAPSHOT_LOAD_COMPLETE",
            Event::SnapshotMissing => "SNAPSHOT_MISSING",
            Event::SnapshotLoadFailed => "SNAPSHOT_LOAD_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SnapshotLoadFailed => Severity::Error,
            Event::SnapshotMissing => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::DatabaseOpen,
            Event::TableCreated,
            Event::IndexCreated,
            Event::SnapshotSaveStart,
            Event::SnapshotSaveComplete,
            Event::SnapshotLoadStart,
            Event::SnapshotLoadComplete,
            Event::SnapshotMissing,
            Event::SnapshotLoadFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::SnapshotLoadFailed.severity(), Severity::Error);
        assert_eq!(Event::SnapshotMissing.severity(), Severity::Warn);
        assert_eq!(Event::TableCreated.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::SnapshotSaveComplete), "SNAPSHOT_SAVE_COMPLETE");
    }
}
