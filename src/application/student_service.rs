use std::sync::Arc;

use crate::{
    domain::{
        group::GroupRepository,
        student::{CreateStudentCommand, Student, StudentRepository, UpdateStudentCommand},
    },
    shared::errors::DomainError,
};

/// Thin pass-through over the student store. The only logic beyond delegation
/// is validating that the referenced group exists on create and update.
pub struct StudentService {
    students: Arc<dyn StudentRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl StudentService {
    pub fn new(students: Arc<dyn StudentRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { students, groups }
    }

    pub async fn create_student(&self, cmd: CreateStudentCommand) -> Result<Student, DomainError> {
        self.ensure_group_exists(cmd.group_id).await?;
        self.students.create(cmd).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, DomainError> {
        self.students.list_all().await
    }

    pub async fn get_student(&self, id: i64) -> Result<Student, DomainError> {
        self.students
            .find_by_id(id)
            .await?
            .ok_or(DomainError::StudentNotFound)
    }

    pub async fn update_student(
        &self,
        id: i64,
        cmd: UpdateStudentCommand,
    ) -> Result<Student, DomainError> {
        self.ensure_group_exists(cmd.group_id).await?;

        if !self.students.update(id, cmd).await? {
            return Err(DomainError::StudentNotFound);
        }

        self.get_student(id).await
    }

    pub async fn delete_student(&self, id: i64) -> Result<(), DomainError> {
        if !self.students.delete(id).await? {
            return Err(DomainError::StudentNotFound);
        }
        Ok(())
    }

    pub async fn search_students(&self, query: &str) -> Result<Vec<Student>, DomainError> {
        self.students.search(query).await
    }

    async fn ensure_group_exists(&self, group_id: i64) -> Result<(), DomainError> {
        if self.groups.find_by_id(group_id).await?.is_none() {
            return Err(DomainError::UnknownGroup(group_id));
        }
        Ok(())
    }
}
