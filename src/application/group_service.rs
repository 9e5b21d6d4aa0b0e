use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    application::group_tree::GroupTreeBuilder,
    domain::group::{CreateGroupCommand, DeleteOutcome, Group, GroupRepository, UpdateGroupCommand},
    shared::errors::DomainError,
};

pub struct GroupService {
    repo: Arc<dyn GroupRepository>,
    tree: GroupTreeBuilder,
}

impl GroupService {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        let tree = GroupTreeBuilder::new(repo.clone());
        Self { repo, tree }
    }

    pub async fn create_group(&self, cmd: CreateGroupCommand) -> Result<Group, DomainError> {
        if let Some(parent_id) = cmd.parent_id {
            self.ensure_parent_exists(parent_id).await?;
        }

        self.repo.create(cmd).await
    }

    /// The full forest, every root expanded.
    pub async fn list_groups(&self) -> Result<Vec<Group>, DomainError> {
        self.tree.build_forest().await
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, DomainError> {
        self.tree.build_subtree(id).await
    }

    pub async fn update_group(
        &self,
        id: i64,
        cmd: UpdateGroupCommand,
    ) -> Result<Group, DomainError> {
        if let Some(parent_id) = cmd.parent_id {
            self.ensure_parent_exists(parent_id).await?;
            self.ensure_no_cycle(id, parent_id).await?;
        }

        if !self.repo.update(id, cmd).await? {
            return Err(DomainError::GroupNotFound);
        }

        self.tree.build_subtree(id).await
    }

    /// Deletion is refused while any other group names this one as parent.
    /// The store performs the guard and the delete as one conditional
    /// statement, so there is no window for a child to appear in between.
    pub async fn delete_group(&self, id: i64) -> Result<(), DomainError> {
        match self.repo.delete_if_leaf(id).await? {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(DomainError::GroupNotFound),
            DeleteOutcome::HasChildren => Err(DomainError::GroupHasSubgroups(id)),
        }
    }

    /// Flat matches only; intentionally asymmetric with `list_groups`, which
    /// expands subtrees.
    pub async fn search_groups(&self, query: &str) -> Result<Vec<Group>, DomainError> {
        self.repo.search_by_name(query).await
    }

    async fn ensure_parent_exists(&self, parent_id: i64) -> Result<(), DomainError> {
        if self.repo.find_by_id(parent_id).await?.is_none() {
            return Err(DomainError::UnknownParentGroup(parent_id));
        }
        Ok(())
    }

    // Walks the proposed parent's ancestor chain; attaching `id` below one of
    // its own descendants (or below itself) is rejected before the write.
    async fn ensure_no_cycle(&self, id: i64, new_parent: i64) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        let mut current = Some(new_parent);

        while let Some(ancestor) = current {
            if ancestor == id {
                return Err(DomainError::ParentCycle {
                    group: id,
                    parent: new_parent,
                });
            }
            if !seen.insert(ancestor) {
                // the chain above the new parent is already cyclic
                return Err(DomainError::CycleDetected(ancestor));
            }
            current = self
                .repo
                .find_by_id(ancestor)
                .await?
                .and_then(|g| g.parent_id);
        }

        Ok(())
    }
}
