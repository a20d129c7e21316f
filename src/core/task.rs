use serde::{Deserialize, Serialize};

/// A task as the server stores it. The collection held by the task list
/// controller is a cache of server truth; the server assigns `id` and it is
/// the identity key for every local patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Mongo-style backends return the identifier as `_id`.
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update sent to PUT /tasks/{id}. Fields left as `None` are omitted
/// from the request body so the server only touches what changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_mongo_id_alias() {
        let json = r#"{"_id":"x1","title":"Buy milk","completed":false}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "x1");
        assert_eq!(task.title, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn deserialize_plain_id() {
        let json = r#"{"id":"7","title":"Water plants","completed":true}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "7");
        assert!(task.completed);
    }

    #[test]
    fn missing_completed_defaults_to_false() {
        let json = r#"{"_id":"x1","title":"Buy milk"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
    }

    #[test]
    fn extra_server_fields_are_ignored() {
        let json = r#"{"_id":"x1","title":"Buy milk","completed":false,
                       "user":"u9","createdAt":"2026-01-01T00:00:00Z","__v":0}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "x1");
    }

    #[test]
    fn patch_omits_unset_fields() {
        let body = serde_json::to_string(&TaskPatch::completed(true)).unwrap();
        assert_eq!(body, r#"{"completed":true}"#);

        let body = serde_json::to_string(&TaskPatch::title("Buy oat milk")).unwrap();
        assert_eq!(body, r#"{"title":"Buy oat milk"}"#);
    }
}
