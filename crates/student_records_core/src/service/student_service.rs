//! Student use-case service.
//!
//! # Responsibility
//! - Provide typed list/search/get/insert/update/delete entry points.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Update and delete of a missing id succeed with zero rows.

use crate::model::student::{Student, StudentDraft, StudentFilter, StudentId};
use crate::repo::student_repo::{RepoResult, StudentRepository};
use log::warn;

/// Use-case service wrapper for student records.
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every record in storage order.
    pub fn list_all(&self) -> RepoResult<Vec<Student>> {
        self.repo.list_students()
    }

    /// Searches with AND-combined equality predicates.
    ///
    /// # Contract
    /// - At least one predicate must be supplied.
    pub fn search(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>> {
        self.repo.search_students(filter)
    }

    pub fn get(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.repo.get_student(id)
    }

    /// Persists a new record and returns its storage-assigned id.
    pub fn insert(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
        self.repo.create_student(draft)
    }

    /// Replaces every writable field of record `id`.
    ///
    /// Returns the number of rows changed.
    pub fn update(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<usize> {
        let changed = self.repo.update_student(id, draft)?;
        if changed == 0 {
            warn!("event=record_update module=service status=ok id={id} rows=0 detail=no_such_id");
        }
        Ok(changed)
    }

    /// Removes record `id`; a missing id is a no-op.
    pub fn delete(&self, id: StudentId) -> RepoResult<usize> {
        let changed = self.repo.delete_student(id)?;
        if changed == 0 {
            warn!("event=record_delete module=service status=ok id={id} rows=0 detail=no_such_id");
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::StudentService;
    use crate::model::student::{Student, StudentDraft, StudentFilter, StudentId};
    use crate::repo::student_repo::{RepoResult, StudentRepository};
    use std::cell::RefCell;

    fn matches(filter: &StudentFilter, student: &Student) -> bool {
        filter.name.as_deref().map_or(true, |name| student.name == name)
            && filter
                .course
                .as_deref()
                .map_or(true, |course| student.course == course)
            && filter.phone.map_or(true, |phone| student.phone == Some(phone))
    }

    #[derive(Default)]
    struct MemoryRepo {
        rows: RefCell<Vec<Student>>,
    }

    impl StudentRepository for MemoryRepo {
        fn list_students(&self) -> RepoResult<Vec<Student>> {
            Ok(self.rows.borrow().clone())
        }

        fn search_students(&self, filter: &StudentFilter) -> RepoResult<Vec<Student>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .filter(|student| matches(filter, student))
                .cloned()
                .collect())
        }

        fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
            Ok(self.rows.borrow().iter().find(|s| s.id == id).cloned())
        }

        fn create_student(&self, draft: &StudentDraft) -> RepoResult<StudentId> {
            let mut rows = self.rows.borrow_mut();
            let id = rows.iter().map(|s| s.id).max().unwrap_or(0) + 1;
            rows.push(Student {
                id,
                name: draft.name.clone(),
                course: draft.course.clone(),
                phone: Some(draft.phone),
            });
            Ok(id)
        }

        fn update_student(&self, id: StudentId, draft: &StudentDraft) -> RepoResult<usize> {
            let mut rows = self.rows.borrow_mut();
            let mut changed = 0;
            for student in rows.iter_mut().filter(|s| s.id == id) {
                student.name = draft.name.clone();
                student.course = draft.course.clone();
                student.phone = Some(draft.phone);
                changed += 1;
            }
            Ok(changed)
        }

        fn delete_student(&self, id: StudentId) -> RepoResult<usize> {
            let mut rows = self.rows.borrow_mut();
            let before = rows.len();
            rows.retain(|s| s.id != id);
            Ok(before - rows.len())
        }
    }

    #[test]
    fn service_delegates_to_repository() {
        let service = StudentService::new(MemoryRepo::default());
        let id = service
            .insert(&StudentDraft::new("Ann", "Math", 5_551_234))
            .unwrap();

        assert_eq!(service.list_all().unwrap().len(), 1);
        assert_eq!(
            service
                .search(&StudentFilter::default().with_name("Ann"))
                .unwrap()[0]
                .id,
            id
        );
        assert_eq!(
            service
                .update(id, &StudentDraft::new("Ann", "Physics", 0))
                .unwrap(),
            1
        );
        assert_eq!(service.get(id).unwrap().unwrap().phone, Some(0));
        assert_eq!(service.delete(id).unwrap(), 1);
        assert!(service.get(id).unwrap().is_none());
    }

    #[test]
    fn fake_search_honors_every_supplied_predicate() {
        let service = StudentService::new(MemoryRepo::default());
        service
            .insert(&StudentDraft::new("Ann", "Math", 5_551_234))
            .unwrap();
        service
            .insert(&StudentDraft::new("Ann", "Physics", 1))
            .unwrap();

        let by_course = service
            .search(&StudentFilter::default().with_name("Ann").with_course("Math"))
            .unwrap();
        assert_eq!(by_course.len(), 1);
        assert_eq!(by_course[0].phone, Some(5_551_234));
        assert!(service
            .search(&StudentFilter::default().with_phone(2))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_id_mutations_report_zero_rows() {
        let service = StudentService::new(MemoryRepo::default());
        assert_eq!(
            service
                .update(404, &StudentDraft::new("Nobody", "History", 1))
                .unwrap(),
            0
        );
        assert_eq!(service.delete(404).unwrap(), 0);
    }
}
