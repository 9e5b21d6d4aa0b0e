//! In-memory repository fakes used by service, tree-builder and router tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    domain::{
        group::{
            CreateGroupCommand, DeleteOutcome, Group, GroupRepository, UpdateGroupCommand,
        },
        student::{CreateStudentCommand, Student, StudentRepository, UpdateStudentCommand},
    },
    shared::errors::DomainError,
};

#[derive(Clone)]
struct GroupRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
}

impl GroupRow {
    fn to_group(&self) -> Group {
        Group {
            id: self.id,
            name: self.name.clone(),
            parent_id: self.parent_id,
            sub_groups: None,
        }
    }
}

#[derive(Default)]
struct GroupsInner {
    next_id: i64,
    rows: BTreeMap<i64, GroupRow>,
}

pub struct InMemoryGroups {
    inner: Mutex<GroupsInner>,
}

impl InMemoryGroups {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(GroupsInner::default()),
        })
    }

    pub fn seed(&self, name: &str, parent_id: Option<i64>) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.insert(
            id,
            GroupRow {
                id,
                name: name.to_string(),
                parent_id,
            },
        );
        id
    }

    /// Rewrites a parent pointer without any checks, for cycle tests.
    pub fn set_parent(&self, id: i64, parent_id: Option<i64>) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(row) = inner.rows.get_mut(&id) {
            row.parent_id = parent_id;
        }
    }

    pub fn name_of(&self, id: i64) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.rows.get(&id).map(|r| r.name.clone())
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroups {
    async fn create(&self, cmd: CreateGroupCommand) -> Result<Group, DomainError> {
        let id = self.seed(&cmd.name, cmd.parent_id);
        Ok(Group {
            id,
            name: cmd.name,
            parent_id: cmd.parent_id,
            sub_groups: None,
        })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.get(&id).map(GroupRow::to_group))
    }

    async fn list_all(&self) -> Result<Vec<Group>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.values().map(GroupRow::to_group).collect())
    }

    async fn list_roots(&self) -> Result<Vec<Group>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .values()
            .filter(|r| r.parent_id.is_none())
            .map(GroupRow::to_group)
            .collect())
    }

    async fn list_children(&self, id: i64) -> Result<Vec<Group>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .values()
            .filter(|r| r.parent_id == Some(id))
            .map(GroupRow::to_group)
            .collect())
    }

    async fn update(&self, id: i64, cmd: UpdateGroupCommand) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.rows.get_mut(&id) {
            Some(row) => {
                row.name = cmd.name;
                row.parent_id = cmd.parent_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_if_leaf(&self, id: i64) -> Result<DeleteOutcome, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.rows.contains_key(&id) {
            return Ok(DeleteOutcome::NotFound);
        }
        if inner.rows.values().any(|r| r.parent_id == Some(id)) {
            return Ok(DeleteOutcome::HasChildren);
        }
        inner.rows.remove(&id);
        Ok(DeleteOutcome::Deleted)
    }

    async fn has_children(&self, id: i64) -> Result<bool, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.values().any(|r| r.parent_id == Some(id)))
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Group>, DomainError> {
        let needle = query.to_lowercase();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .values()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .map(GroupRow::to_group)
            .collect())
    }
}

#[derive(Clone)]
struct StudentRow {
    id: i64,
    name: String,
    #[allow(dead_code)]
    email: String,
    group_id: i64,
}

impl StudentRow {
    fn to_student(&self) -> Student {
        Student {
            id: self.id,
            name: self.name.clone(),
            group_id: self.group_id,
        }
    }
}

#[derive(Default)]
struct StudentsInner {
    next_id: i64,
    rows: BTreeMap<i64, StudentRow>,
}

pub struct InMemoryStudents {
    inner: Mutex<StudentsInner>,
    groups: Arc<InMemoryGroups>,
}

impl InMemoryStudents {
    pub fn new(groups: Arc<InMemoryGroups>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(StudentsInner::default()),
            groups,
        })
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudents {
    async fn create(&self, cmd: CreateStudentCommand) -> Result<Student, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        let row = StudentRow {
            id,
            name: cmd.name,
            email: cmd.email,
            group_id: cmd.group_id,
        };
        let student = row.to_student();
        inner.rows.insert(id, row);
        Ok(student)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.get(&id).map(StudentRow::to_student))
    }

    async fn list_all(&self) -> Result<Vec<Student>, DomainError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.values().map(StudentRow::to_student).collect())
    }

    async fn update(&self, id: i64, cmd: UpdateStudentCommand) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.rows.get_mut(&id) {
            Some(row) => {
                row.name = cmd.name;
                row.group_id = cmd.group_id;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.rows.remove(&id).is_some())
    }

    async fn search(&self, query: &str) -> Result<Vec<Student>, DomainError> {
        let needle = query.to_lowercase();
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .values()
            .filter(|r| {
                let group_name = self.groups.name_of(r.group_id).unwrap_or_default();
                r.name.to_lowercase().contains(&needle)
                    || group_name.to_lowercase().contains(&needle)
            })
            .map(StudentRow::to_student)
            .collect())
    }
}
