//! # Student Admin TUI
//!
//! A terminal admin console for student records kept behind a REST API.
//!
//! ## Features
//! - Student table with program and faculty columns
//! - Creation form with a program selector
//! - Edit dialog working on a detached draft
//! - Delete from the table
//! - Success/error notifications for every mutation
//! - Full list re-fetch after each successful mutation
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod config;
pub mod constants;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use models::{NewStudent, Program, Student, StudentDraft, StudentField, StudentId};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, Operation, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiError, NetworkActor, StudentClient};
