use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// A student, attached to exactly one group.
///
/// The email address is write-only: it is carried by the create command and
/// persisted, but no read path selects it, so the entity has no email field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub group_id: i64,
}

#[derive(Debug, Clone)]
pub struct CreateStudentCommand {
    pub name: String,
    pub email: String,
    pub group_id: i64,
}

#[derive(Debug, Clone)]
pub struct UpdateStudentCommand {
    pub name: String,
    pub group_id: i64,
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, cmd: CreateStudentCommand) -> Result<Student, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Student>, DomainError>;
    /// Returns false when no row matched the id.
    async fn update(&self, id: i64, cmd: UpdateStudentCommand) -> Result<bool, DomainError>;
    /// Returns false when no row matched the id.
    async fn delete(&self, id: i64) -> Result<bool, DomainError>;
    /// Case-insensitive substring match on the student name or the owning
    /// group's name.
    async fn search(&self, query: &str) -> Result<Vec<Student>, DomainError>;
}
