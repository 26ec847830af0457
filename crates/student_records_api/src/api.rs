//! Envelope API for presentation callers.
//!
//! # Responsibility
//! - Expose list/search/get/insert/update/delete as boolean-outcome responses.
//! - Treat blank search fields the way an empty form field reads: not supplied.
//!
//! # Invariants
//! - Functions never panic; every failure becomes `ok = false` plus a message.
//! - Each call opens and releases its own connection through the core service.
//! - After a failed mutation callers keep their current view.

use log::warn;
use serde::Serialize;
use student_records_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Course, LogSink,
    RecordError, RecordService, StoreConfig, Student, StudentId,
};

/// Outcome of a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Id of the inserted record; `None` for update/delete and failures.
    pub id: Option<StudentId>,
    /// Rows written; zero for a missing id.
    pub rows_affected: usize,
    /// Human-readable message for the status line.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<StudentId>, rows_affected: usize) -> Self {
        Self {
            ok: true,
            id,
            rows_affected,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            rows_affected: 0,
            message: message.into(),
        }
    }
}

/// Outcome of list-all and filtered search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordsResponse {
    pub ok: bool,
    /// Matching records in storage order; empty on failure.
    pub students: Vec<Student>,
    pub message: String,
}

impl RecordsResponse {
    /// Table cells `(id, name, course, phone)` for every record.
    pub fn rows(&self) -> Vec<[String; 4]> {
        self.students.iter().map(Student::to_row).collect()
    }
}

/// Outcome of get-by-id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordResponse {
    pub ok: bool,
    pub student: Option<Student>,
    pub message: String,
}

/// Envelope facade over one configured store.
#[derive(Debug, Clone)]
pub struct RecordsApi {
    service: RecordService,
}

impl RecordsApi {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            service: RecordService::new(config),
        }
    }

    pub fn list_all(&self) -> RecordsResponse {
        records_response("list", self.service.list_all())
    }

    /// Searches by the supplied fields.
    ///
    /// Blank or whitespace-only text counts as not supplied; when nothing is
    /// supplied the response fails with a malformed-query message.
    pub fn search(
        &self,
        name: Option<&str>,
        course: Option<&str>,
        phone: Option<&str>,
    ) -> RecordsResponse {
        records_response(
            "search",
            self.service
                .search(supplied(name), supplied(course), supplied(phone)),
        )
    }

    pub fn get(&self, id: StudentId) -> RecordResponse {
        match self.service.get(id) {
            Ok(Some(student)) => RecordResponse {
                ok: true,
                student: Some(student),
                message: format!("Student record {id} found."),
            },
            Ok(None) => RecordResponse {
                ok: true,
                student: None,
                message: format!("No student record with id {id}."),
            },
            Err(err) => RecordResponse {
                ok: false,
                student: None,
                message: failure_message("get", &err),
            },
        }
    }

    pub fn insert(&self, name: &str, course: &str, phone: &str) -> ActionResponse {
        match self.service.insert(name, course, phone) {
            Ok(id) => ActionResponse::success("Student record added.", Some(id), 1),
            Err(err) => ActionResponse::failure(failure_message("insert", &err)),
        }
    }

    /// Replaces every field of record `id` with the values given.
    pub fn update(&self, id: StudentId, name: &str, course: &str, phone: &str) -> ActionResponse {
        match self.service.update(id, name, course, phone) {
            Ok(0) => ActionResponse::success(
                format!("No student record with id {id}; nothing changed."),
                None,
                0,
            ),
            Ok(rows) => ActionResponse::success("Student record updated.", None, rows),
            Err(err) => ActionResponse::failure(failure_message("update", &err)),
        }
    }

    pub fn delete(&self, id: StudentId) -> ActionResponse {
        match self.service.delete(id) {
            Ok(0) => ActionResponse::success(
                format!("No student record with id {id}; nothing deleted."),
                None,
                0,
            ),
            Ok(rows) => ActionResponse::success(
                "The record has been deleted successfully.",
                None,
                rows,
            ),
            Err(err) => ActionResponse::failure(failure_message("delete", &err)),
        }
    }
}

/// Course names offered by entry forms, in display order.
pub fn courses() -> Vec<String> {
    Course::ALL.iter().map(|course| course.to_string()).collect()
}

pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// `log_dir = None` logs to stderr; otherwise it must be an absolute
/// directory for rolling files. Returns an empty string on success and the
/// error message on failure.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> String {
    let sink = match log_dir {
        Some(dir) => match LogSink::directory(dir) {
            Ok(sink) => sink,
            Err(err) => return err,
        },
        None => LogSink::Stderr,
    };

    match init_logging_inner(level, sink) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

fn records_response(op: &str, result: Result<Vec<Student>, RecordError>) -> RecordsResponse {
    match result {
        Ok(students) => RecordsResponse {
            ok: true,
            message: format!("{} record(s).", students.len()),
            students,
        },
        Err(err) => RecordsResponse {
            ok: false,
            students: Vec::new(),
            message: failure_message(op, &err),
        },
    }
}

fn failure_message(op: &str, err: &RecordError) -> String {
    warn!(
        "event=api_{op} module=api status=error error_code={}",
        err.code()
    );
    format!("{op} failed: {err}")
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
