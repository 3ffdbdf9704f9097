//! Data Transfer Objects for API requests and responses.
//!
//! Request bodies are first decoded into [`TaskPayload`], which keeps the due
//! date as raw text. [`TaskPayload::validate`] then checks the fields and
//! converts them into domain values.

use serde::{Deserialize, Serialize};

use super::error::{FieldError, ValidationError};
use crate::domain::{DueDate, NewTask, Task};

// =============================================================================
// Task DTOs
// =============================================================================

/// Request body for creating or replacing a task.
///
/// Absent and `null` fields both decode to `None`. Any `id` in the body is
/// ignored; for updates the id comes from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskPayload {
    /// Title of the task.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Status of the task.
    #[serde(default)]
    pub status: Option<String>,
    /// Due date as text, in either accepted format.
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TaskPayload {
    /// Decodes a request body as JSON. The request's content type is not
    /// consulted.
    ///
    /// # Errors
    ///
    /// Returns the decoder error for malformed JSON, a non-object body or a
    /// field of the wrong type.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Validates the payload and converts it into a [`NewTask`].
    ///
    /// All field errors are reported together.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the title or status is empty, or the
    /// due date is missing or in neither accepted format.
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        let title = validate_required_text("title", "Title is required", self.title);
        let status = validate_required_text("status", "Status is required", self.status);
        let due_date = validate_due_date(self.due_date.as_deref());

        match (title, status, due_date) {
            (Ok(title), Ok(status), Ok(due_date)) => Ok(NewTask {
                title,
                description: self.description.unwrap_or_default(),
                status,
                due_date,
            }),
            (title, status, due_date) => Err(ValidationError::new(
                [title.err(), status.err(), due_date.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            )),
        }
    }
}

/// Response body for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: i32,
    /// Title of the task.
    pub title: String,
    /// Description of the task.
    pub description: String,
    /// Status of the task.
    pub status: String,
    /// Due date as a full RFC 3339 timestamp.
    pub due_date: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.value(),
            due_date: task.due_date.to_rfc3339(),
            title: task.title,
            description: task.description,
            status: task.status,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a required free-text field.
///
/// Only an absent or empty value is rejected; accepted values are kept
/// verbatim, surrounding whitespace included.
fn validate_required_text(
    field: &str,
    message: &str,
    value: Option<String>,
) -> Result<String, FieldError> {
    value
        .filter(|text| !text.is_empty())
        .ok_or_else(|| FieldError::new(field, message))
}

/// Validates and parses the due date.
fn validate_due_date(raw: Option<&str>) -> Result<DueDate, FieldError> {
    DueDate::parse(raw.unwrap_or_default())
        .map_err(|error| FieldError::new("due_date", error.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use rstest::rstest;

    fn payload(json: serde_json::Value) -> TaskPayload {
        TaskPayload::from_json(json.to_string().as_bytes()).expect("payload should decode")
    }

    // -------------------------------------------------------------------------
    // Decoding Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_payload_rejects_numeric_title() {
        let body = serde_json::json!({
            "title": 123,
            "status": "pending",
            "due_date": "2023-01-01T00:00"
        });
        assert!(TaskPayload::from_json(body.to_string().as_bytes()).is_err());
    }

    #[rstest]
    #[case(b"{\"title\": ".as_slice())]
    #[case(b"42".as_slice())]
    #[case(b"".as_slice())]
    #[case(b"title=Buy+milk".as_slice())]
    fn test_payload_rejects_undecodable_body(#[case] body: &[u8]) {
        assert!(TaskPayload::from_json(body).is_err());
    }

    #[rstest]
    fn test_payload_ignores_body_id() {
        let decoded = payload(serde_json::json!({
            "id": 77,
            "title": "Buy milk",
            "status": "pending",
            "due_date": "2023-06-01T10:00"
        }));
        assert_eq!(decoded.title.as_deref(), Some("Buy milk"));
    }

    // -------------------------------------------------------------------------
    // Validation Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_validate_complete_payload() {
        let new_task = payload(serde_json::json!({
            "title": "Buy milk",
            "description": "Two litres",
            "status": "pending",
            "due_date": "2023-06-01T10:00"
        }))
        .validate()
        .unwrap();

        assert_eq!(new_task.title, "Buy milk");
        assert_eq!(new_task.description, "Two litres");
        assert_eq!(new_task.status, "pending");
        assert_eq!(new_task.due_date.to_rfc3339(), "2023-06-01T10:00:00Z");
    }

    #[rstest]
    fn test_validate_description_defaults_to_empty() {
        let new_task = payload(serde_json::json!({
            "title": "Buy milk",
            "status": "pending",
            "due_date": "2023-06-01T10:00:00Z"
        }))
        .validate()
        .unwrap();

        assert_eq!(new_task.description, "");
    }

    #[rstest]
    #[case(
        serde_json::json!({"title": "", "status": "pending", "due_date": "2023-06-01T10:00"}),
        "title"
    )]
    #[case(
        serde_json::json!({"status": "pending", "due_date": "2023-06-01T10:00"}),
        "title"
    )]
    #[case(
        serde_json::json!({"title": "Buy milk", "status": "", "due_date": "2023-06-01T10:00"}),
        "status"
    )]
    #[case(
        serde_json::json!({"title": "Buy milk", "status": null, "due_date": "2023-06-01T10:00"}),
        "status"
    )]
    #[case(
        serde_json::json!({"title": "Buy milk", "status": "pending"}),
        "due_date"
    )]
    #[case(
        serde_json::json!({"title": "Buy milk", "status": "pending", "due_date": ""}),
        "due_date"
    )]
    #[case(
        serde_json::json!({"title": "Buy milk", "status": "pending", "due_date": "next week"}),
        "due_date"
    )]
    #[case(
        serde_json::json!({"title": "Milk", "status": "pending", "due_date": "2023-06-01 10:00"}),
        "due_date"
    )]
    fn test_validate_rejects_single_field(
        #[case] json: serde_json::Value,
        #[case] expected_field: &str,
    ) {
        let error = payload(json).validate().unwrap_err();

        assert_eq!(error.errors.len(), 1);
        assert_eq!(error.errors[0].field, expected_field);
    }

    #[rstest]
    #[case(" ", "pending")]
    #[case("Buy milk", "   ")]
    fn test_validate_accepts_whitespace_text_verbatim(#[case] title: &str, #[case] status: &str) {
        let new_task = payload(serde_json::json!({
            "title": title,
            "status": status,
            "due_date": "2023-06-01T10:00"
        }))
        .validate()
        .unwrap();

        assert_eq!(new_task.title, title);
        assert_eq!(new_task.status, status);
    }

    #[rstest]
    fn test_validate_reports_all_field_errors() {
        let error = payload(serde_json::json!({})).validate().unwrap_err();

        let fields: Vec<&str> = error.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "status", "due_date"]);
        assert_eq!(error.errors[2].message, "due_date is required");
    }

    // -------------------------------------------------------------------------
    // TaskResponse Tests
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_task_response_from_task() {
        let task = Task {
            id: TaskId::new(4),
            title: "Buy milk".to_string(),
            description: String::new(),
            status: "pending".to_string(),
            due_date: DueDate::parse("2023-06-01T10:00").unwrap(),
        };

        let response = TaskResponse::from(task);

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "id": 4,
                "title": "Buy milk",
                "description": "",
                "status": "pending",
                "due_date": "2023-06-01T10:00:00Z"
            })
        );
    }
}
