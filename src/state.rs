use std::sync::Arc;

use crate::application::{group_service::GroupService, student_service::StudentService};

#[derive(Clone)]
pub struct AppState {
    pub group_service: Arc<GroupService>,
    pub student_service: Arc<StudentService>,
}

impl AppState {
    pub fn new(group_service: Arc<GroupService>, student_service: Arc<StudentService>) -> Self {
        Self {
            group_service,
            student_service,
        }
    }
}

pub type SharedState = Arc<AppState>;
