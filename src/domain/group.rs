use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

/// An academic group. Groups form a forest via `parent_id`.
///
/// `sub_groups` is `None` on flat reads (the key is absent from the JSON) and
/// is only populated by the tree builder; a materialized leaf serializes as
/// `"subGroups": []`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(rename = "subGroups", skip_serializing_if = "Option::is_none", default)]
    pub sub_groups: Option<Vec<Group>>,
}

#[derive(Debug, Clone)]
pub struct CreateGroupCommand {
    pub name: String,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct UpdateGroupCommand {
    pub name: String,
    pub parent_id: Option<i64>,
}

/// Result of a conditional leaf delete. The store decides the outcome in a
/// single statement so no child can appear between a check and the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    HasChildren,
}

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, cmd: CreateGroupCommand) -> Result<Group, DomainError>;
    /// Flat lookup; `sub_groups` is never populated.
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, DomainError>;
    async fn list_all(&self) -> Result<Vec<Group>, DomainError>;
    async fn list_roots(&self) -> Result<Vec<Group>, DomainError>;
    async fn list_children(&self, id: i64) -> Result<Vec<Group>, DomainError>;
    /// Returns false when no row matched the id.
    async fn update(&self, id: i64, cmd: UpdateGroupCommand) -> Result<bool, DomainError>;
    /// Deletes the group only if it currently has no children.
    async fn delete_if_leaf(&self, id: i64) -> Result<DeleteOutcome, DomainError>;
    async fn has_children(&self, id: i64) -> Result<bool, DomainError>;
    /// Case-insensitive substring match on the group name, flat results.
    async fn search_by_name(&self, query: &str) -> Result<Vec<Group>, DomainError>;
}
