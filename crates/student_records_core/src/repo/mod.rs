//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the student data access contract.
//! - Isolate SQLite statement details from service orchestration.
//!
//! # Invariants
//! - Repositories borrow a connection; they never open or close one.
//! - Missing ids on update/delete are reported as zero rows, not errors.

pub mod student_query;
pub mod student_repo;
