use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::{
    domain::{
        group::{
            CreateGroupCommand, DeleteOutcome, Group, GroupRepository, UpdateGroupCommand,
        },
        student::{CreateStudentCommand, Student, StudentRepository, UpdateStudentCommand},
    },
    shared::errors::DomainError,
};

fn store_error(op: &str, err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(format!("{op}: {err}"))
}

fn like_pattern(query: &str) -> String {
    format!("%{query}%")
}

pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct GroupRow {
    id: i64,
    name: String,
    parent_id: Option<i64>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            sub_groups: None,
        }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn create(&self, cmd: CreateGroupCommand) -> Result<Group, DomainError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO groups (name, parent_id)
            VALUES ($1, $2)
            RETURNING id, name, parent_id
            "#,
        )
        .bind(&cmd.name)
        .bind(cmd.parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("create_group", e))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, DomainError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, parent_id
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find_group", e))?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, parent_id
            FROM groups
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list_groups", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_roots(&self) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, parent_id
            FROM groups
            WHERE parent_id IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list_root_groups", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_children(&self, id: i64) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, parent_id
            FROM groups
            WHERE parent_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list_child_groups", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, cmd: UpdateGroupCommand) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE groups
            SET name = $2, parent_id = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&cmd.name)
        .bind(cmd.parent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("update_group", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_if_leaf(&self, id: i64) -> Result<DeleteOutcome, DomainError> {
        // Guard and delete in one statement: a child inserted concurrently
        // can never slip between a has-children check and the delete.
        let result = sqlx::query(
            r#"
            DELETE FROM groups
            WHERE id = $1
              AND NOT EXISTS (SELECT 1 FROM groups c WHERE c.parent_id = $1)
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("delete_group", e))?;

        if result.rows_affected() > 0 {
            return Ok(DeleteOutcome::Deleted);
        }

        // Nothing deleted: either the row is missing or it has children.
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM groups WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("delete_group_classify", e))?;

        if exists {
            Ok(DeleteOutcome::HasChildren)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    async fn has_children(&self, id: i64) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM groups WHERE parent_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("has_subgroups", e))
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Group>, DomainError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, parent_id
            FROM groups
            WHERE name ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("search_groups", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

pub struct PgStudentRepository {
    pool: PgPool,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Email is deliberately never selected; it is write-only.
#[derive(FromRow)]
struct StudentRow {
    id: i64,
    name: String,
    group_id: i64,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Student {
            id: row.id,
            name: row.name,
            group_id: row.group_id,
        }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn create(&self, cmd: CreateStudentCommand) -> Result<Student, DomainError> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            INSERT INTO students (name, email, group_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, group_id
            "#,
        )
        .bind(&cmd.name)
        .bind(&cmd.email)
        .bind(cmd.group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("create_student", e))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Student>, DomainError> {
        let row = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, group_id
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find_student", e))?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Student>, DomainError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT id, name, group_id
            FROM students
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list_students", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, cmd: UpdateStudentCommand) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET name = $2, group_id = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&cmd.name)
        .bind(cmd.group_id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("update_student", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("delete_student", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, query: &str) -> Result<Vec<Student>, DomainError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            r#"
            SELECT s.id, s.name, s.group_id
            FROM students s
            JOIN groups g ON g.id = s.group_id
            WHERE s.name ILIKE $1 OR g.name ILIKE $1
            ORDER BY s.id
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("search_students", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
