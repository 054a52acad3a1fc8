mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use rusqlite::{ffi, Connection, OptionalExtension};

use crate::error::{RosterError, RosterResult};
use crate::models::*;

/// Storage contract for the roster.
///
/// Every call is self-contained: it takes the connection, does its work and
/// releases it before returning, on error paths too. Multi-statement writes
/// (cascading cleaner removal, checked task insert) run in one transaction.
pub trait RosterStore: Clone + Send + Sync + 'static {
    /// Create or upgrade the schema and seed the `Admin` cleaner if absent.
    fn initialize(&self) -> RosterResult<()>;

    fn list_cleaners(&self) -> RosterResult<Vec<Cleaner>>;

    fn find_cleaner_by_name(&self, name: &str) -> RosterResult<Option<Cleaner>>;

    /// Fails with `Validation` on a blank name and `Conflict` on a duplicate.
    fn insert_cleaner(&self, name: &str) -> RosterResult<Cleaner>;

    /// Remove a cleaner and every task they own. Returns whether the cleaner existed.
    fn delete_cleaner(&self, id: RowId) -> RosterResult<bool>;

    fn list_tasks(&self, cleaner_id: Option<RowId>) -> RosterResult<Vec<TaskWithCleaner>>;

    /// Fails with `Validation` when `cleaner_id` does not name an existing cleaner.
    fn insert_task(&self, input: &CreateTaskInput) -> RosterResult<Task>;

    /// Returns whether a task was removed.
    fn delete_task(&self, id: RowId) -> RosterResult<bool>;

    /// Returns whether a task was updated.
    fn set_task_completed(&self, id: RowId, completed: bool) -> RosterResult<bool>;
}

/// SQLite-backed roster store.
///
/// Cloning is cheap and shares the underlying connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "cleaning-roster")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("roster.db"))
    }

    pub fn open_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> RosterResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RosterError::LockPoisoned)
    }

    pub fn get_cleaner(&self, id: RowId) -> RosterResult<Option<Cleaner>> {
        let conn = self.conn()?;
        let cleaner = conn
            .query_row("SELECT id, name FROM cleaners WHERE id = ?", [id], |row| {
                Ok(Cleaner {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(cleaner)
    }

    pub fn get_task(&self, id: RowId) -> RosterResult<Option<Task>> {
        let conn = self.conn()?;
        let task = conn
            .query_row(
                "SELECT id, cleaner_id, day, task, completed FROM tasks WHERE id = ?",
                [id],
                |row| {
                    Ok(Task {
                        id: row.get(0)?,
                        cleaner_id: row.get(1)?,
                        day: row.get(2)?,
                        task: row.get(3)?,
                        completed: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(task)
    }
}

impl RosterStore for Database {
    fn initialize(&self) -> RosterResult<()> {
        let conn = self.conn()?;
        schema::run_migrations(&conn)?;

        let admin_exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM cleaners WHERE name = ?)",
            [ADMIN_CLEANER_NAME],
            |row| row.get(0),
        )?;
        if !admin_exists {
            conn.execute(
                "INSERT INTO cleaners (name) VALUES (?)",
                [ADMIN_CLEANER_NAME],
            )?;
            tracing::info!("Seeded {} cleaner", ADMIN_CLEANER_NAME);
        }

        Ok(())
    }

    // ============================================================
    // Cleaner operations
    // ============================================================

    fn list_cleaners(&self) -> RosterResult<Vec<Cleaner>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM cleaners ORDER BY id")?;

        let cleaners = stmt
            .query_map([], |row| {
                Ok(Cleaner {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cleaners)
    }

    fn find_cleaner_by_name(&self, name: &str) -> RosterResult<Option<Cleaner>> {
        let conn = self.conn()?;
        let cleaner = conn
            .query_row(
                "SELECT id, name FROM cleaners WHERE name = ?",
                [name.trim()],
                |row| {
                    Ok(Cleaner {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(cleaner)
    }

    fn insert_cleaner(&self, name: &str) -> RosterResult<Cleaner> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::validation("Cleaner name must not be empty"));
        }

        let conn = self.conn()?;
        match conn.execute("INSERT INTO cleaners (name) VALUES (?)", [name]) {
            Ok(_) => Ok(Cleaner {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_UNIQUE) => Err(
                RosterError::conflict(format!("Cleaner '{}' already exists", name)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    fn delete_cleaner(&self, id: RowId) -> RosterResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        // Tasks first, the foreign key forbids orphaning them
        let tasks_removed = tx.execute("DELETE FROM tasks WHERE cleaner_id = ?", [id])?;
        let cleaners_removed = tx.execute("DELETE FROM cleaners WHERE id = ?", [id])?;
        tx.commit()?;

        tracing::debug!(cleaner_id = id, tasks_removed, "Deleted cleaner");
        Ok(cleaners_removed > 0)
    }

    // ============================================================
    // Task operations
    // ============================================================

    fn list_tasks(&self, cleaner_id: Option<RowId>) -> RosterResult<Vec<TaskWithCleaner>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT tasks.id, tasks.cleaner_id, cleaners.name, tasks.day, tasks.task, tasks.completed
             FROM tasks
             JOIN cleaners ON tasks.cleaner_id = cleaners.id
             WHERE ?1 IS NULL OR tasks.cleaner_id = ?1
             ORDER BY tasks.id",
        )?;

        let tasks = stmt
            .query_map([cleaner_id], |row| {
                Ok(TaskWithCleaner {
                    id: row.get(0)?,
                    cleaner_id: row.get(1)?,
                    cleaner: row.get(2)?,
                    day: row.get(3)?,
                    task: row.get(4)?,
                    completed: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    fn insert_task(&self, input: &CreateTaskInput) -> RosterResult<Task> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let cleaner_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM cleaners WHERE id = ?)",
            [input.cleaner_id],
            |row| row.get(0),
        )?;
        if !cleaner_exists {
            return Err(unknown_cleaner(input.cleaner_id));
        }

        let inserted = tx.execute(
            "INSERT INTO tasks (cleaner_id, day, task, completed) VALUES (?, ?, ?, 0)",
            (input.cleaner_id, &input.day, &input.task),
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_constraint(&e, ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                return Err(unknown_cleaner(input.cleaner_id));
            }
            Err(e) => return Err(e.into()),
        }
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Task {
            id,
            cleaner_id: input.cleaner_id,
            day: input.day.clone(),
            task: input.task.clone(),
            completed: false,
        })
    }

    fn delete_task(&self, id: RowId) -> RosterResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM tasks WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    fn set_task_completed(&self, id: RowId, completed: bool) -> RosterResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE tasks SET completed = ? WHERE id = ?",
            (completed, id),
        )?;
        Ok(rows > 0)
    }
}

fn unknown_cleaner(id: RowId) -> RosterError {
    RosterError::validation(format!("Cleaner {} does not exist", id))
}

fn is_constraint(err: &rusqlite::Error, extended_code: std::ffi::c_int) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended_code)
}
