use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::{
    domain::group::{Group, GroupRepository},
    shared::errors::DomainError,
};

/// Read-side projection that materializes group subtrees from the flat store.
///
/// Owns no state; every call re-reads the store, one point query per node
/// visited. The data sets are small and this is not a hot path, so there is
/// no batching or memoization.
pub struct GroupTreeBuilder {
    repo: Arc<dyn GroupRepository>,
}

impl GroupTreeBuilder {
    pub fn new(repo: Arc<dyn GroupRepository>) -> Self {
        Self { repo }
    }

    /// Fetches the group and recursively attaches the full subtree of each
    /// direct child, in store order.
    pub async fn build_subtree(&self, id: i64) -> Result<Group, DomainError> {
        let group = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        let mut visited = HashSet::new();
        self.expand(group, &mut visited).await
    }

    /// Every root group (no parent), each fully expanded.
    pub async fn build_forest(&self) -> Result<Vec<Group>, DomainError> {
        let roots = self.repo.list_roots().await?;

        let mut forest = Vec::with_capacity(roots.len());
        for root in roots {
            let mut visited = HashSet::new();
            forest.push(self.expand(root, &mut visited).await?);
        }

        Ok(forest)
    }

    // The visited set is per traversal: a parent cycle in the stored data
    // must surface as an error instead of unbounded recursion. Boxed because
    // async fns cannot recurse directly.
    fn expand<'a>(
        &'a self,
        mut group: Group,
        visited: &'a mut HashSet<i64>,
    ) -> Pin<Box<dyn Future<Output = Result<Group, DomainError>> + Send + 'a>> {
        Box::pin(async move {
            if !visited.insert(group.id) {
                return Err(DomainError::CycleDetected(group.id));
            }

            let children = self.repo.list_children(group.id).await?;
            let mut sub_groups = Vec::with_capacity(children.len());
            for child in children {
                sub_groups.push(self.expand(child, &mut *visited).await?);
            }

            group.sub_groups = Some(sub_groups);
            Ok(group)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemoryGroups;

    #[tokio::test]
    async fn subtree_contains_children_recursively_in_store_order() {
        let groups = InMemoryGroups::new();
        let math = groups.seed("Math", None);
        let algebra = groups.seed("Math/Algebra", Some(math));
        let geometry = groups.seed("Math/Geometry", Some(math));
        let rings = groups.seed("Math/Algebra/Rings", Some(algebra));

        let tree = GroupTreeBuilder::new(groups.clone());
        let root = tree.build_subtree(math).await.unwrap();

        assert_eq!(root.id, math);
        let children = root.sub_groups.unwrap();
        assert_eq!(
            children.iter().map(|g| g.id).collect::<Vec<_>>(),
            vec![algebra, geometry]
        );

        let algebra_children = children[0].sub_groups.as_ref().unwrap();
        assert_eq!(algebra_children[0].id, rings);
        // materialized leaves carry an empty list, not a missing one
        assert_eq!(algebra_children[0].sub_groups, Some(vec![]));
        assert_eq!(children[1].sub_groups, Some(vec![]));
    }

    #[tokio::test]
    async fn forest_expands_every_root() {
        let groups = InMemoryGroups::new();
        let math = groups.seed("Math", None);
        let physics = groups.seed("Physics", None);
        groups.seed("Math/Algebra", Some(math));

        let tree = GroupTreeBuilder::new(groups.clone());
        let forest = tree.build_forest().await.unwrap();

        assert_eq!(forest.iter().map(|g| g.id).collect::<Vec<_>>(), vec![math, physics]);
        assert_eq!(forest[0].sub_groups.as_ref().unwrap().len(), 1);
        assert_eq!(forest[1].sub_groups, Some(vec![]));
    }

    #[tokio::test]
    async fn missing_group_is_not_found() {
        let groups = InMemoryGroups::new();
        let tree = GroupTreeBuilder::new(groups);

        let err = tree.build_subtree(42).await.unwrap_err();
        assert!(matches!(err, DomainError::GroupNotFound));
    }

    #[tokio::test]
    async fn parent_cycle_fails_instead_of_recursing() {
        let groups = InMemoryGroups::new();
        let a = groups.seed("A", None);
        let b = groups.seed("B", Some(a));
        groups.set_parent(a, Some(b));

        let tree = GroupTreeBuilder::new(groups.clone());
        let err = tree.build_subtree(a).await.unwrap_err();
        assert!(matches!(err, DomainError::CycleDetected(_)));
    }
}
