//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide list/search/get and id-keyed mutations over the `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every value reaches SQL as a bound parameter.
//! - Each mutation runs in its own transaction; an error leaves the table
//!   unchanged.
//! - NULL cells from earlier releases are read leniently so one row never hides
//!   the rest of the table; mistyped cells are still rejected.

use crate::db::schema::students_table_exists;
use crate::db::DbError;
use crate::model::student::{InputError, Student, StudentDraft, StudentFilter, StudentId};
use crate::repo::student_query::{build_search_statement, QueryError, STUDENT_SELECT_SQL};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    InvalidInput(InputError),
    QueryMalformed(QueryError),
    Db(DbError),
    MissingStudentsTable,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::QueryMalformed(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingStudentsTable => write!(f, "required table `students` is missing"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::QueryMalformed(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingStudentsTable => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<InputError> for RepoError {
    fn from(value: InputError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::QueryMalformed(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for student records.
///
/// Mutations report the number of rows they touched; zero is not an error.
pub trait StudentRepository {
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn search_students(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId>;
    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<usize>;
    fn delete_student(&self, id: StudentId) -> RepoResult<usize>;
}

/// SQLite-backed student repository borrowing a bootstrapped connection.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Wraps `conn` after checking the `students` table is present.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !students_table_exists(conn)? {
            return Err(RepoError::MissingStudentsTable);
        }
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn list_students(&self) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(STUDENT_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn search_students(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>> {
        let statement = build_search_statement(filter)?;

        let mut stmt = self.conn.prepare(&statement.sql)?;
        let mut rows = stmt.query(params_from_iter(statement.params))?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_student_row(row)))
            .optional()?;

        row.transpose()
    }

    fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO students (name, course, mobile) VALUES (?1, ?2, ?3);",
            params![draft.name.as_str(), draft.course.as_str(), draft.phone],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE students
             SET
                name = ?1,
                course = ?2,
                mobile = ?3
             WHERE id = ?4;",
            params![draft.name.as_str(), draft.course.as_str(), draft.phone, id],
        )?;
        tx.commit()?;

        Ok(changed)
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute("DELETE FROM students WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(changed)
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    let name = nullable_cell::<String>(row, "name", id)?;
    let course = nullable_cell::<String>(row, "course", id)?;
    let phone = nullable_cell::<i64>(row, "mobile", id)?;

    if name.is_none() || course.is_none() || phone.is_none() {
        debug!("event=student_row_read module=repo status=ok id={id} detail=null_cells");
    }

    Ok(Student {
        id,
        name: name.unwrap_or_default(),
        course: course.unwrap_or_default(),
        phone,
    })
}

fn nullable_cell<T: rusqlite::types::FromSql>(
    row: &Row<'_>,
    column: &str,
    id: StudentId,
) -> RepoResult<Option<T>> {
    row.get::<_, Option<T>>(column).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(_, _, kind) => RepoError::InvalidData(format!(
            "unexpected {kind} value in students.{column} for id {id}"
        )),
        other => RepoError::from(other),
    })
}
