//! Roster use cases.
//!
//! Each operation is one store call. Mutations that succeed, including
//! removals and updates of ids that no longer exist, signal the
//! [`ChangeNotifier`] afterwards. Reads never signal.

use crate::db::RosterStore;
use crate::error::{RosterError, RosterResult};
use crate::models::*;
use crate::notify::ChangeNotifier;

#[derive(Clone)]
pub struct RosterService<S: RosterStore> {
    store: S,
    notifier: ChangeNotifier,
    admin_secret: String,
}

impl<S: RosterStore> RosterService<S> {
    pub fn new(store: S, notifier: ChangeNotifier, admin_secret: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            admin_secret: admin_secret.into(),
        }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a login.
    ///
    /// The password is compared verbatim against the shared admin secret. Any
    /// other password is ignored and the name is looked up instead.
    pub fn authenticate(&self, input: &AuthenticateInput) -> RosterResult<Authenticated> {
        if input.password.as_deref() == Some(self.admin_secret.as_str()) {
            tracing::info!("Admin authenticated");
            return Ok(Authenticated::admin());
        }

        let name = match input.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(RosterError::validation(
                    "Name is required for non-admin access",
                ))
            }
        };

        let cleaner = self
            .store
            .find_cleaner_by_name(name)?
            .ok_or(RosterError::InvalidCredentials)?;
        tracing::info!(cleaner_id = cleaner.id, "Cleaner authenticated");
        Ok(Authenticated::cleaner(cleaner.id))
    }

    // ============================================================
    // Cleaners
    // ============================================================

    pub fn list_cleaners(&self) -> RosterResult<Vec<Cleaner>> {
        self.store.list_cleaners()
    }

    pub fn add_cleaner(&self, input: &CreateCleanerInput) -> RosterResult<Cleaner> {
        let cleaner = self.store.insert_cleaner(&input.name)?;
        tracing::debug!(cleaner_id = cleaner.id, "Added cleaner");
        self.notifier.notify();
        Ok(cleaner)
    }

    pub fn remove_cleaner(&self, id: RowId) -> RosterResult<()> {
        if !self.store.delete_cleaner(id)? {
            tracing::debug!(cleaner_id = id, "Cleaner already absent");
        }
        self.notifier.notify();
        Ok(())
    }

    // ============================================================
    // Tasks
    // ============================================================

    pub fn list_tasks(&self, query: &ListTasksQuery) -> RosterResult<Vec<TaskWithCleaner>> {
        self.store.list_tasks(query.cleaner_id)
    }

    pub fn add_task(&self, input: &CreateTaskInput) -> RosterResult<Task> {
        let task = self.store.insert_task(input)?;
        tracing::debug!(task_id = task.id, cleaner_id = task.cleaner_id, "Added task");
        self.notifier.notify();
        Ok(task)
    }

    pub fn remove_task(&self, id: RowId) -> RosterResult<()> {
        if !self.store.delete_task(id)? {
            tracing::debug!(task_id = id, "Task already absent");
        }
        self.notifier.notify();
        Ok(())
    }

    pub fn set_task_completed(&self, input: &SetTaskCompletedInput) -> RosterResult<()> {
        if !self.store.set_task_completed(input.id, input.completed)? {
            tracing::debug!(task_id = input.id, "Task to update is absent");
        }
        self.notifier.notify();
        Ok(())
    }
}
