//! Student record model.
//!
//! # Responsibility
//! - Define the record shape returned to callers.
//! - Define insert/update payloads and the optional-predicate search filter.
//! - Coerce phone input text to its integer storage form.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes.
//! - `course` is free text at this layer; `Course` is only the offered set.
//! - Filter fields use presence (`Some`) to mean "predicate supplied", so
//!   zero and empty values are real predicates.
//! - Files written by earlier releases may hold NULL cells; reads surface a
//!   NULL phone as `None` and NULL text as an empty string.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned primary key of a student row.
pub type StudentId = i64;

/// One persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub course: String,
    /// Stored in the `mobile` column; `None` when the cell is NULL.
    pub phone: Option<i64>,
}

impl Student {
    /// Renders the `(id, name, course, phone)` cells shown by a table view.
    ///
    /// A missing phone renders as an empty cell.
    pub fn to_row(&self) -> [String; 4] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.course.clone(),
            self.phone.map(|phone| phone.to_string()).unwrap_or_default(),
        ]
    }
}

/// Field values for insert and full-replacement update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub course: String,
    pub phone: i64,
}

impl StudentDraft {
    pub fn new(name: impl Into<String>, course: impl Into<String>, phone: i64) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            phone,
        }
    }

    /// Builds a payload from form text, coercing `phone` to an integer.
    pub fn from_input(name: &str, course: &str, phone: &str) -> Result<Self, InputError> {
        Ok(Self::new(name, course, parse_phone(phone)?))
    }
}

/// Equality predicates for filtered search, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub name: Option<String>,
    pub course: Option<String>,
    pub phone: Option<i64>,
}

impl StudentFilter {
    /// Builds a filter from optional form text, coercing `phone` when present.
    pub fn from_input(
        name: Option<&str>,
        course: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, InputError> {
        Ok(Self {
            name: name.map(str::to_string),
            course: course.map(str::to_string),
            phone: phone.map(parse_phone).transpose()?,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    pub fn with_phone(mut self, phone: i64) -> Self {
        self.phone = Some(phone);
        self
    }

    /// Returns `true` when no predicate is supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.course.is_none() && self.phone.is_none()
    }
}

/// Courses offered by the entry forms.
///
/// Storage accepts any course text; this set only drives selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    Math,
    Physics,
    Chemistry,
    Biology,
    History,
    Science,
}

impl Course {
    pub const ALL: [Course; 6] = [
        Course::Math,
        Course::Physics,
        Course::Chemistry,
        Course::Biology,
        Course::History,
        Course::Science,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Course::Math => "Math",
            Course::Physics => "Physics",
            Course::Chemistry => "Chemistry",
            Course::Biology => "Biology",
            Course::History => "History",
            Course::Science => "Science",
        }
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = InputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Course::ALL
            .into_iter()
            .find(|course| course.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InputError::UnknownCourse(trimmed.to_string()))
    }
}

/// Input coercion failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Phone text is not an integer.
    InvalidPhone(String),
    /// Course text is outside the offered set.
    UnknownCourse(String),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPhone(value) => {
                write!(f, "phone must be an integer, got `{value}`")
            }
            Self::UnknownCourse(value) => write!(
                f,
                "unknown course `{value}`; expected one of {}",
                Course::ALL
                    .iter()
                    .map(|course| course.as_str())
                    .collect::<Vec<_>>()
                    .join("|")
            ),
        }
    }
}

impl Error for InputError {}

/// Parses phone text into its stored integer form.
///
/// Surrounding whitespace and a leading sign are accepted; digit count and
/// formatting are not checked.
pub fn parse_phone(raw: &str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| InputError::InvalidPhone(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_phone, Course, InputError, Student, StudentDraft, StudentFilter};

    fn ann() -> Student {
        Student {
            id: 7,
            name: "Ann".to_string(),
            course: "Math".to_string(),
            phone: Some(5_551_234),
        }
    }

    #[test]
    fn parse_phone_accepts_integers_with_padding() {
        assert_eq!(parse_phone("5551234"), Ok(5_551_234));
        assert_eq!(parse_phone("  42 "), Ok(42));
        assert_eq!(parse_phone("0"), Ok(0));
        assert_eq!(parse_phone("-3"), Ok(-3));
    }

    #[test]
    fn parse_phone_rejects_non_numeric_text() {
        assert_eq!(
            parse_phone("555-1234"),
            Err(InputError::InvalidPhone("555-1234".to_string()))
        );
        assert!(parse_phone("").is_err());
        assert!(parse_phone("12.5").is_err());
        assert!(parse_phone("1; DROP TABLE students").is_err());
    }

    #[test]
    fn draft_from_input_coerces_phone() {
        let draft = StudentDraft::from_input("Ann", "Math", "5551234").unwrap();
        assert_eq!(draft, StudentDraft::new("Ann", "Math", 5_551_234));

        let err = StudentDraft::from_input("Ann", "Math", "call me").unwrap_err();
        assert!(matches!(err, InputError::InvalidPhone(_)));
    }

    #[test]
    fn to_row_renders_table_cells() {
        assert_eq!(
            ann().to_row(),
            [
                "7".to_string(),
                "Ann".to_string(),
                "Math".to_string(),
                "5551234".to_string()
            ]
        );

        let no_phone = Student { phone: None, ..ann() };
        assert_eq!(no_phone.to_row()[3], "");
    }

    #[test]
    fn filter_treats_zero_and_empty_as_supplied() {
        let filter = StudentFilter::from_input(Some(""), None, Some("0")).unwrap();
        assert_eq!(filter.name.as_deref(), Some(""));
        assert_eq!(filter.phone, Some(0));
        assert!(!filter.is_empty());
        assert!(StudentFilter::default().is_empty());
    }

    #[test]
    fn course_parses_case_insensitively() {
        assert_eq!("physics".parse::<Course>(), Ok(Course::Physics));
        assert_eq!(" History ".parse::<Course>(), Ok(Course::History));
        assert!(matches!(
            "Art".parse::<Course>(),
            Err(InputError::UnknownCourse(value)) if value == "Art"
        ));
        assert_eq!(Course::ALL.len(), 6);
        assert_eq!(Course::Science.to_string(), "Science");
    }
}
