//! Household cleaning roster: cleaners, the tasks assigned to them per day,
//! and live "something changed" pushes to connected clients.
//!
//! Layers, leaves first:
//! - [`db`]: SQLite persistence behind the [`db::RosterStore`] trait.
//! - [`service`]: validated use cases that signal [`notify::ChangeNotifier`] on change.
//! - [`api`]: the axum HTTP/WebSocket surface.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod net;
pub mod notify;
pub mod qr;
pub mod service;
