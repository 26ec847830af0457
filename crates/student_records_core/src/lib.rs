//! Core data access for student records.
//! This crate owns the storage gateway and the record query/mutation contract.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use db::{open_db, open_db_in_memory, open_db_with, DbError, DbResult, StorageGateway};
pub use logging::{default_log_level, init_logging, logging_status, LogSink};
pub use model::student::{
    parse_phone, Course, InputError, Student, StudentDraft, StudentFilter, StudentId,
};
pub use repo::student_query::{build_search_statement, QueryError, SearchStatement};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};
pub use service::records::{RecordError, RecordResult, RecordService};
pub use service::student_service::StudentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
