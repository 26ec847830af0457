//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into record-level APIs.
//! - Keep envelope and CLI layers decoupled from storage details.

pub mod records;
pub mod student_service;
