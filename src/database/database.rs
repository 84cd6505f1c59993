use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{DbError, DbResult};
use crate::join::JoinEngine;
use crate::observability::{Event, Logger};
use crate::schema::{Columns, Row};
use crate::snapshot::SnapshotCodec;
use crate::table::Table;

use super::config::DatabaseConfig;

/// Named tables plus the snapshot file they persist to.
///
/// Single-threaded: callers sharing a database serialize access themselves.
#[derive(Debug)]
pub struct Database {
    tables: BTreeMap<String, Table>,
    snapshot_path: PathBuf,
    pretty: bool,
    logger: Logger,
}

impl Database {
    /// Empty database bound to `snapshot_path`. Nothing is read from disk.
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self::with_logger(snapshot_path, Logger::default())
    }

    /// Empty database that logs through `logger`
    pub fn with_logger(snapshot_path: impl Into<PathBuf>, logger: Logger) -> Self {
        let snapshot_path = snapshot_path.into();
        logger.log_event(
            Event::DatabaseOpen,
            &[("snapshot_path", &snapshot_path.display().to_string())],
        );
        Self {
            tables: BTreeMap::new(),
            snapshot_path,
            pretty: false,
            logger,
        }
    }

    /// New database populated from its snapshot, if one exists
    pub fn open(snapshot_path: impl Into<PathBuf>) -> DbResult<Self> {
        let mut db = Self::new(snapshot_path);
        db.load()?;
        Ok(db)
    }

    /// Opens the database described by `config`
    pub fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let logger = Logger::new(config.severity()?);
        let mut db = Self::with_logger(config.snapshot_path(), logger);
        db.pretty = config.pretty_snapshot;
        db.load()?;
        Ok(db)
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn set_pretty_snapshot(&mut self, pretty: bool) {
        self.pretty = pretty;
    }

    /// Table names in ascending order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// `Schema` if the name is taken, the column set is empty or the primary
    /// key is undeclared.
    pub fn create_table(&mut self, name: &str, columns: Columns, primary_key: Option<&str>) -> DbResult<()> {
        if self.tables.contains_key(name) {
            return Err(DbError::schema(format!("table '{}' already exists", name)));
        }
        let table = Table::new(name, columns, primary_key)?;
        self.tables.insert(name.to_string(), table);
        self.logger.log_event(
            Event::TableCreated,
            &[("table", name), ("primary_key", primary_key.unwrap_or(""))],
        );
        Ok(())
    }

    pub fn get_table(&self, name: &str) -> DbResult<&Table> {
        self.tables.get(name).ok_or_else(|| DbError::not_found(name))
    }

    pub fn get_table_mut(&mut self, name: &str) -> DbResult<&mut Table> {
        self.tables.get_mut(name).ok_or_else(|| DbError::not_found(name))
    }

    /// `Table::create_index` on a named table, logged
    pub fn create_index(&mut self, table: &str, column: &str, unique: bool) -> DbResult<()> {
        self.get_table_mut(table)?.create_index(column, unique)?;
        self.logger.log_event(
            Event::IndexCreated,
            &[
                ("column", column),
                ("table", table),
                ("unique", if unique { "true" } else { "false" }),
            ],
        );
        Ok(())
    }

    /// Equality join of two named tables
    pub fn join(&self, left: &str, right: &str, left_key: &str, right_key: &str) -> DbResult<Vec<Row>> {
        let left = self.get_table(left)?;
        let right = self.get_table(right)?;
        Ok(JoinEngine::new(left, right, left_key, right_key)?.execute())
    }

    /// Writes every table to the snapshot file
    pub fn save(&self) -> DbResult<()> {
        let path = self.snapshot_path.display().to_string();
        self.logger.log_event(Event::SnapshotSaveStart, &[("path", &path)]);

        let stats = SnapshotCodec::write(&self.snapshot_path, &self.tables, self.pretty)?;

        self.logger.log_event(
            Event::SnapshotSaveComplete,
            &[
                ("bytes", &stats.bytes.to_string()),
                ("checksum", &stats.checksum),
                ("path", &path),
                ("rows", &stats.rows.to_string()),
                ("tables", &stats.tables.to_string()),
            ],
        );
        Ok(())
    }

    /// Replaces in-memory tables with the snapshot contents.
    ///
    /// A missing snapshot leaves the database as it is. A snapshot that
    /// cannot be restored is an error and also leaves the database as it is.
    pub fn load(&mut self) -> DbResult<()> {
        let path = self.snapshot_path.display().to_string();
        self.logger.log_event(Event::SnapshotLoadStart, &[("path", &path)]);

        let loaded = match SnapshotCodec::read(&self.snapshot_path) {
            Ok(Some(loaded)) => loaded,
            Ok(None) => {
                self.logger.log_event(Event::SnapshotMissing, &[("path", &path)]);
                return Ok(());
            }
            Err(e) => {
                self.logger.log_event(
                    Event::SnapshotLoadFailed,
                    &[("code", e.code().code()), ("error", e.message()), ("path", &path)],
                );
                return Err(e.into());
            }
        };

        let rows = loaded.row_count().to_string();
        self.tables = loaded.tables;
        self.logger.log_event(
            Event::SnapshotLoadComplete,
            &[
                ("created_at", &loaded.created_at),
                ("path", &path),
                ("rows", &rows),
                ("tables", &self.tables.len().to_string()),
            ],
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Severity;
    use crate::schema::{columns, ColumnType, Value};
    use crate::table::Predicate;
    use serde_json::json;
    use tempfile::TempDir;

    fn quiet(path: PathBuf) -> Database {
        Database::with_logger(path, Logger::new(Severity::Fatal))
    }

    fn user_columns() -> Columns {
        columns([("id", ColumnType::Int), ("name", ColumnType::Str)])
    }

    #[test]
    fn test_create_and_get_table() {
        let tmp = TempDir::new().unwrap();
        let mut db = quiet(tmp.path().join("db.json"));
        db.create_table("users", user_columns(), Some("id")).unwrap();

        assert!(db.has_table("users"));
        assert_eq!(db.table_names().collect::<Vec<_>>(), vec!["users"]);
        assert_eq!(db.get_table("users").unwrap().primary_key(), Some("id"));
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut db = quiet(tmp.path().join("db.json"));
        db.create_table("users", user_columns(), Some("id")).unwrap();
        let err = db.create_table("users", user_columns(), None).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_missing_table_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut db = quiet(tmp.path().join("db.json"));
        assert!(db.get_table("ghost").unwrap_err().is_not_found());
        assert!(db.get_table_mut("ghost").unwrap_err().is_not_found());
        assert!(db.join("ghost", "ghost", "a", "b").unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("db.json");
        let mut db = quiet(path.clone());
        db.create_table("users", user_columns(), Some("id")).unwrap();
        db.get_table_mut("users")
            .unwrap()
            .insert(&json!({"id": 1, "name": "Alice"}))
            .unwrap();
        db.save().unwrap();

        let mut reopened = quiet(path);
        reopened.load().unwrap();
        let rows = reopened
            .get_table("users")
            .unwrap()
            .select(&Predicate::eq("id", 1))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&Value::from("Alice")));
    }

    #[test]
    fn test_lifecycle_events_logged() {
        let tmp = TempDir::new().unwrap();
        let (logger, capture) = Logger::capture(Severity::Trace);
        let mut db = Database::with_logger(tmp.path().join("db.json"), logger);

        db.load().unwrap();
        db.create_table("users", user_columns(), Some("id")).unwrap();
        db.create_index("users", "name", false).unwrap();
        db.get_table_mut("users")
            .unwrap()
            .insert(&json!({"id": 1, "name": "Alice"}))
            .unwrap();
        db.save().unwrap();

        assert_eq!(
            capture.events(),
            vec![
                "DATABASE_OPEN",
                "SNAPSHOT_LOAD_START",
                "SNAPSHOT_MISSING",
                "TABLE_CREATED",
                "INDEX_CREATED",
                "SNAPSHOT_SAVE_START",
                "SNAPSHOT_SAVE_COMPLETE",
            ]
        );
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("db.json");
        std::fs::write(&path, "not a snapshot").unwrap();

        let mut db = quiet(path);
        db.create_table("users", user_columns(), Some("id")).unwrap();
        let err = db.load().unwrap_err();

        assert_eq!(err.code(), "TDB_SNAPSHOT_CORRUPT");
        assert!(db.has_table("users"));
    }

    #[test]
    fn test_from_config_applies_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("db.json");
        let mut config = DatabaseConfig::with_snapshot_path(path.display().to_string());
        config.pretty_snapshot = true;
        config.log_level = "fatal".to_string();

        let mut db = Database::from_config(&config).unwrap();
        db.create_table("t", columns([("a", ColumnType::Int)]), None).unwrap();
        db.save().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'));
    }
}
