//! Record service boundary used by presentation layers.
//!
//! # Responsibility
//! - Coerce form text into typed payloads and filters.
//! - Open one connection per call and release it on every exit path.
//! - Map layer errors into the boundary `RecordError` taxonomy.
//!
//! # Invariants
//! - Input coercion happens before storage is touched.
//! - No connection outlives the call that opened it.
//! - Log lines carry ids and counts only, never record contents.

use crate::config::StoreConfig;
use crate::db::{DbError, StorageGateway};
use crate::model::student::{InputError, Student, StudentDraft, StudentFilter, StudentId};
use crate::repo::student_query::QueryError;
use crate::repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository};
use crate::service::student_service::StudentService;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RecordResult<T> = Result<T, RecordError>;

/// Boundary error for record operations.
#[derive(Debug)]
pub enum RecordError {
    /// The store file cannot be opened.
    StorageUnavailable(DbError),
    /// Phone text is not an integer.
    InvalidInput(InputError),
    /// Filtered search without any predicate.
    QueryMalformed(QueryError),
    /// Any other backend failure.
    Storage(RepoError),
}

impl RecordError {
    /// Stable identifier used in log lines and envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::InvalidInput(_) => "invalid_input",
            Self::QueryMalformed(_) => "query_malformed",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "{err}"),
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::QueryMalformed(err) => write!(f, "malformed query: {err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) => Some(err),
            Self::InvalidInput(err) => Some(err),
            Self::QueryMalformed(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<InputError> for RecordError {
    fn from(value: InputError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<QueryError> for RecordError {
    fn from(value: QueryError) -> Self {
        Self::QueryMalformed(value)
    }
}

impl From<DbError> for RecordError {
    fn from(value: DbError) -> Self {
        match value {
            err @ DbError::StorageUnavailable { .. } => Self::StorageUnavailable(err),
            other => Self::Storage(RepoError::Db(other)),
        }
    }
}

impl From<RepoError> for RecordError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidInput(err) => Self::InvalidInput(err),
            RepoError::QueryMalformed(err) => Self::QueryMalformed(err),
            RepoError::Db(err) => Self::from(err),
            other => Self::Storage(other),
        }
    }
}

/// Per-call-connection facade over [`StudentService`].
#[derive(Debug, Clone)]
pub struct RecordService {
    gateway: StorageGateway,
}

impl RecordService {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_gateway(StorageGateway::new(config))
    }

    pub fn with_gateway(gateway: StorageGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &StorageGateway {
        &self.gateway
    }

    /// Returns every record in storage order.
    pub fn list_all(&self) -> RecordResult<Vec<Student>> {
        let students = self.run("record_list", |service| service.list_all())?;
        info!(
            "event=record_list module=service status=ok count={}",
            students.len()
        );
        Ok(students)
    }

    /// Searches with optional form text; `None` skips a predicate.
    ///
    /// # Errors
    /// - `InvalidInput` when `phone` is not an integer.
    /// - `QueryMalformed` when every field is `None`.
    pub fn search(
        &self,
        name: Option<&str>,
        course: Option<&str>,
        phone: Option<&str>,
    ) -> RecordResult<Vec<Student>> {
        let filter = coerce("record_search", StudentFilter::from_input(name, course, phone))?;
        self.search_filter(&filter)
    }

    pub fn search_filter(&self, filter: &StudentFilter) -> RecordResult<Vec<Student>> {
        if filter.is_empty() {
            let err = RecordError::from(QueryError::EmptyFilter);
            log_failure("record_search", Instant::now(), &err);
            return Err(err);
        }
        let students = self.run("record_search", |service| service.search(filter))?;
        info!(
            "event=record_search module=service status=ok count={}",
            students.len()
        );
        Ok(students)
    }

    pub fn get(&self, id: StudentId) -> RecordResult<Option<Student>> {
        self.run("record_get", |service| service.get(id))
    }

    /// Inserts a record from form text and returns the new id.
    pub fn insert(&self, name: &str, course: &str, phone: &str) -> RecordResult<StudentId> {
        let draft = coerce("record_insert", StudentDraft::from_input(name, course, phone))?;
        self.insert_draft(&draft)
    }

    pub fn insert_draft(&self, draft: &StudentDraft) -> RecordResult<StudentId> {
        let id = self.run("record_insert", |service| service.insert(draft))?;
        info!("event=record_insert module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces every writable field of record `id` from form text.
    ///
    /// Returns rows affected; a missing id yields `Ok(0)`.
    pub fn update(
        &self,
        id: StudentId,
        name: &str,
        course: &str,
        phone: &str,
    ) -> RecordResult<usize> {
        let draft = coerce("record_update", StudentDraft::from_input(name, course, phone))?;
        self.update_draft(id, &draft)
    }

    pub fn update_draft(&self, id: StudentId, draft: &StudentDraft) -> RecordResult<usize> {
        let changed = self.run("record_update", |service| service.update(id, draft))?;
        info!("event=record_update module=service status=ok id={id} rows={changed}");
        Ok(changed)
    }

    /// Deletes record `id`. Returns rows affected; a missing id yields `Ok(0)`.
    pub fn delete(&self, id: StudentId) -> RecordResult<usize> {
        let changed = self.run("record_delete", |service| service.delete(id))?;
        info!("event=record_delete module=service status=ok id={id} rows={changed}");
        Ok(changed)
    }

    fn run<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&StudentService<SqliteStudentRepository<'_>>) -> RepoResult<T>,
    ) -> RecordResult<T> {
        let started_at = Instant::now();
        let result = self
            .gateway
            .connect()
            .map_err(RecordError::from)
            .and_then(|conn| {
                let repo = SqliteStudentRepository::try_new(&conn)?;
                let service = StudentService::new(repo);
                let value = op(&service)?;
                Ok(value)
            });

        match &result {
            Ok(_) => debug!(
                "event={event} module=service status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure(event, started_at, err),
        }
        result
    }
}

fn coerce<T>(event: &'static str, value: Result<T, InputError>) -> RecordResult<T> {
    value.map_err(|err| {
        let err = RecordError::from(err);
        log_failure(event, Instant::now(), &err);
        err
    })
}

fn log_failure(event: &str, started_at: Instant, err: &RecordError) {
    error!(
        "event={event} module=service status=error duration_ms={} error_code={}",
        started_at.elapsed().as_millis(),
        err.code()
    );
}
