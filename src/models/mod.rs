//! Domain models for the cleaning roster.
//!
//! - [`Cleaner`]: a named person tasks are assigned to. Cleaner names double
//!   as the non-admin login identity.
//! - [`Task`]: one unit of work for one cleaner on one day, with a completion flag.
//! - [`TaskWithCleaner`]: a task joined with its owner's name, as listed to clients.
//!
//! Request payloads ([`CreateCleanerInput`], [`CreateTaskInput`], ...) live next
//! to the entity they create or modify.

mod auth;
mod cleaner;
mod task;

pub use auth::*;
pub use cleaner::*;
pub use task::*;

/// Store-assigned identifier for cleaners and tasks.
pub type RowId = i64;
