//! Core use-case services.
//!
//! # Responsibility
//! - Compose the pure calendar/status/import logic with repositories.
//! - Keep route collaborators decoupled from storage details.

pub mod habit_service;
pub mod import_service;
