//! Domain model for student records.
//!
//! # Responsibility
//! - Define the record, payload and filter shapes shared by every layer.
//!
//! # Invariants
//! - Every record is identified by a storage-assigned `StudentId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod student;
