//! Task wire types and list helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task as returned by the API. Deleted tasks never appear in responses
/// (the server soft-deletes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a task. Only the title is required.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl NewTask {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Body for updating a task. Absent fields are left untouched on PATCH;
/// PUT expects the full field set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// A page of results in the server's pagination envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Completed/pending counts over a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, completed: bool) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            description: String::new(),
            completed,
            created_at: "2024-01-15T10:30:00Z".parse().unwrap(),
            updated_at: "2024-01-15T10:30:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_parse_paginated_page() {
        let json = r#"{
            "count": 2,
            "next": "http://localhost:8000/api/tasks/?page=2",
            "previous": null,
            "results": [
                {"id": 1, "title": "Write report", "description": "Q3 numbers",
                 "completed": false,
                 "created_at": "2024-01-15T10:30:00Z", "updated_at": "2024-01-16T08:00:00Z"},
                {"id": 2, "title": "Ship release", "description": "",
                 "completed": true,
                 "created_at": "2024-01-10T09:00:00Z", "updated_at": "2024-01-14T17:45:00Z"}
            ]
        }"#;

        let page: Paginated<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.results.len(), 2);
        assert!(page.next.is_some());
        assert!(page.previous.is_none());
        assert_eq!(page.results[0].title, "Write report");
        assert!(page.results[1].completed);
    }

    #[test]
    fn test_new_task_omits_unset_fields() {
        let body = serde_json::to_value(NewTask::with_title("Buy milk")).unwrap();
        assert_eq!(body, serde_json::json!({"title": "Buy milk"}));
    }

    #[test]
    fn test_task_update_serializes_only_changes() {
        let update = TaskUpdate {
            completed: Some(true),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"completed": true}));
    }

    #[test]
    fn test_stats() {
        let tasks = vec![task(1, true), task(2, false), task(3, false)];
        let stats = TaskStats::of(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(TaskStats::of(&[]), TaskStats::default());
    }
}
