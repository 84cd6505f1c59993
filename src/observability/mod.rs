//! Observability subsystem for tabledb
//!
//! Structured JSON lifecycle logging. Observability is read-only: logging
//! never changes the outcome of an operation and a failed write to the log
//! sink is ignored.
//!
//! ```
//! use tabledb::observability::{Event, Logger, Severity};
//!
//! let logger = Logger::new(Severity::Warn);
//! logger.log_event(Event::TableCreated, &[("table", "users")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{format_line, LogCapture, Logger, Severity};

impl Logger {
    /// Log a lifecycle event at its own severity
    pub fn log_event(&self, event: Event, fields: &[(&str, &str)]) {
        self.log(event.severity(), event.as_str(), fields);
    }
}
