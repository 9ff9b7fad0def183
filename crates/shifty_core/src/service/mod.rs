//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce application-level authorization (creator-only task mutation).
//! - Keep callers decoupled from storage details.

pub mod task_service;
pub mod team_service;
