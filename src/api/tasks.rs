//! Task endpoints. All of them require authentication.

use crate::models::{NewTask, Paginated, Task, TaskUpdate};

use super::client::ApiClient;
use super::ApiError;

/// Task collection path
const TASKS_PATH: &str = "/api/tasks/";

/// Tasks API client.
pub struct TasksApi {
    client: ApiClient,
}

impl TasksApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn task_path(id: i64) -> String {
        format!("{}{}/", TASKS_PATH, id)
    }

    /// List the authenticated user's tasks, one page at a time. Pages are
    /// 1-indexed.
    pub async fn list(&self, page: u32) -> Result<Paginated<Task>, ApiError> {
        self.client
            .get_with_query(TASKS_PATH, &[("page", page)])
            .await
    }

    /// Fetch a single task by id.
    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        self.client.get(&Self::task_path(id)).await
    }

    /// Create a new task.
    pub async fn create(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.client.post(TASKS_PATH, task).await
    }

    /// Replace a task (PUT). Missing optional fields are reset server-side.
    pub async fn update(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.client.put(&Self::task_path(id), update).await
    }

    /// Partially update a task (PATCH). Only the provided fields change.
    pub async fn patch(&self, id: i64, update: &TaskUpdate) -> Result<Task, ApiError> {
        self.client.patch(&Self::task_path(id), update).await
    }

    /// Delete a task. The server soft-deletes and answers 204.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&Self::task_path(id)).await
    }

    /// Mark a task completed or pending.
    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<Task, ApiError> {
        self.patch(
            id,
            &TaskUpdate {
                completed: Some(completed),
                ..Default::default()
            },
        )
        .await
    }
}
