//! Todo record shape and input validation.
//!
//! # Design
//! Request payloads arrive as loosely typed values (`NewTodo`, `TodoPatch`) so
//! that a missing title or an unknown priority tier is reported as a
//! field-level validation failure instead of a body-parse error. Validation
//! turns them into `TodoDraft` / `TodoChanges`, which are valid by
//! construction. Nothing in this module touches the store or the clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Opaque record identifier, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Priority tier. Variant order is display order: `High < Medium < Low`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized priority `{0}`, expected one of: high, medium, low")]
pub struct UnknownPriority(String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(UnknownPriority(other.to_string())),
        }
    }
}

/// A stored todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a brand-new record from a validated draft. Both timestamps are `now`.
    pub fn from_draft(id: TodoId, draft: TodoDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One field of a partial update: omitted, explicitly `null`, or set.
///
/// Use with `#[serde(default)]` so an omitted key deserializes as `Absent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Collapse explicit `null` into "leave untouched", for fields that
    /// cannot be cleared.
    fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Absent | Patch::Null => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(value_type = String, example = "title")]
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed validation in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn check_title(&mut self, title: &str) {
        if title.trim().is_empty() {
            self.push("title", "must not be empty");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            self.push("title", format!("must be at most {TITLE_MAX_CHARS} characters"));
        }
    }

    fn check_description(&mut self, description: &str) {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            self.push(
                "description",
                format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
            );
        }
    }

    fn parse_priority(&mut self, raw: &str) -> Option<Priority> {
        match raw.parse() {
            Ok(priority) => Some(priority),
            Err(err) => {
                self.push("priority", err.to_string());
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { errors: self.0 })
        }
    }
}

/// Creation payload as received on the wire.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewTodo {
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    #[schema(value_type = Option<Priority>)]
    pub priority: Option<String>,
}

impl NewTodo {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Validate and apply creation defaults (`completed = false`,
    /// `priority = medium`).
    pub fn validate(self) -> Result<TodoDraft, ValidationError> {
        let mut violations = Violations::default();

        match self.title.as_deref() {
            Some(title) => violations.check_title(title),
            None => violations.push("title", "is required"),
        }
        if let Some(description) = self.description.as_deref() {
            violations.check_description(description);
        }
        let priority = match self.priority.as_deref() {
            Some(raw) => violations.parse_priority(raw),
            None => Some(Priority::default()),
        };

        let draft = TodoDraft {
            title: self.title.unwrap_or_default(),
            description: self.description,
            completed: self.completed.unwrap_or(false),
            priority: priority.unwrap_or_default(),
        };
        violations.finish(draft)
    }
}

/// A creation payload that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
}

/// Partial-update payload as received on the wire.
///
/// `description: null` clears the description. `null` on any other field is
/// treated the same as omitting it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TodoPatch {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<bool>)]
    pub completed: Patch<bool>,
    #[serde(default)]
    #[schema(value_type = Option<Priority>)]
    pub priority: Patch<String>,
}

impl TodoPatch {
    /// A patch that only sets the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Patch::Value(completed),
            ..Self::default()
        }
    }

    /// Validate only the fields that are present.
    pub fn validate(self) -> Result<TodoChanges, ValidationError> {
        let mut violations = Violations::default();

        let title = self.title.into_value();
        if let Some(title) = title.as_deref() {
            violations.check_title(title);
        }
        if let Patch::Value(description) = &self.description {
            violations.check_description(description);
        }
        let priority = self
            .priority
            .into_value()
            .and_then(|raw| violations.parse_priority(&raw));

        let changes = TodoChanges {
            title,
            description: self.description,
            completed: self.completed.into_value(),
            priority,
        };
        violations.finish(changes)
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl TodoChanges {
    /// Overwrite every present field on `todo`. Timestamps are left to the caller.
    pub fn apply_to(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        match self.description {
            Patch::Absent => {}
            Patch::Null => todo.description = None,
            Patch::Value(description) => todo.description = Some(description),
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn sample_todo() -> Todo {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Todo {
            id: TodoId::from("t-1"),
            title: "Buy milk".to_string(),
            description: Some("two litres".to_string()),
            completed: false,
            priority: Priority::High,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn priority_orders_high_first() {
        let mut tiers = vec![Priority::Low, Priority::High, Priority::Medium];
        tiers.sort();
        assert_eq!(tiers, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Priority::High).unwrap(), "high");
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
    }

    #[test]
    fn todo_serializes_all_fields() {
        let json = serde_json::to_value(sample_todo()).unwrap();
        assert_eq!(json["id"], "t-1");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], "two litres");
        assert_eq!(json["completed"], false);
        assert_eq!(json["priority"], "high");
        assert_eq!(json["created_at"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn todo_without_description_serializes_null() {
        let mut todo = sample_todo();
        todo.description = None;
        let json = serde_json::to_value(&todo).unwrap();
        assert!(json["description"].is_null());
    }

    #[test]
    fn new_todo_applies_defaults() {
        let draft = NewTodo::titled("Minimal").validate().unwrap();
        assert_eq!(draft.title, "Minimal");
        assert_eq!(draft.description, None);
        assert!(!draft.completed);
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn new_todo_null_priority_defaults_to_medium() {
        let input: NewTodo =
            serde_json::from_str(r#"{"title":"x","priority":null}"#).unwrap();
        assert_eq!(input.validate().unwrap().priority, Priority::Medium);
    }

    #[test]
    fn new_todo_missing_title_is_field_error() {
        let input: NewTodo = serde_json::from_str(r#"{"completed":true}"#).unwrap();
        let err = input.validate().unwrap_err();
        assert!(err.has_field("title"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn new_todo_rejects_blank_title(#[case] title: &str) {
        let err = NewTodo::titled(title).validate().unwrap_err();
        assert!(err.has_field("title"));
    }

    #[test]
    fn title_length_limit_is_inclusive() {
        assert!(NewTodo::titled("x".repeat(TITLE_MAX_CHARS)).validate().is_ok());
        let err = NewTodo::titled("x".repeat(TITLE_MAX_CHARS + 1))
            .validate()
            .unwrap_err();
        assert!(err.has_field("title"));
    }

    #[test]
    fn description_length_limit() {
        let input = NewTodo {
            description: Some("x".repeat(DESCRIPTION_MAX_CHARS + 1)),
            ..NewTodo::titled("ok")
        };
        assert!(input.validate().unwrap_err().has_field("description"));
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let input = NewTodo {
            priority: Some("urgent".to_string()),
            ..NewTodo::titled("ok")
        };
        let err = input.validate().unwrap_err();
        assert!(err.has_field("priority"));
        assert!(err.to_string().contains("urgent"));
    }

    #[test]
    fn every_bad_field_is_reported() {
        let input = NewTodo {
            title: Some(" ".to_string()),
            priority: Some("urgent".to_string()),
            ..NewTodo::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn patch_distinguishes_absent_null_and_value() {
        let patch: TodoPatch =
            serde_json::from_str(r#"{"description":null,"title":"New"}"#).unwrap();
        assert_eq!(patch.title, Patch::Value("New".to_string()));
        assert_eq!(patch.description, Patch::Null);
        assert!(patch.completed.is_absent());
        assert!(patch.priority.is_absent());
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut todo = sample_todo();
        let before = todo.clone();
        TodoPatch::default().validate().unwrap().apply_to(&mut todo);
        assert_eq!(todo, before);
    }

    #[test]
    fn completed_only_patch_leaves_other_fields() {
        let mut todo = sample_todo();
        TodoPatch::completed(true).validate().unwrap().apply_to(&mut todo);
        assert!(todo.completed);
        assert_eq!(todo.title, "Buy milk");
        assert_eq!(todo.description.as_deref(), Some("two litres"));
        assert_eq!(todo.priority, Priority::High);
    }

    #[test]
    fn null_description_clears_it() {
        let mut todo = sample_todo();
        let patch: TodoPatch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        patch.validate().unwrap().apply_to(&mut todo);
        assert_eq!(todo.description, None);
    }

    #[test]
    fn null_title_is_left_untouched() {
        let mut todo = sample_todo();
        let patch: TodoPatch =
            serde_json::from_str(r#"{"title":null,"completed":true}"#).unwrap();
        patch.validate().unwrap().apply_to(&mut todo);
        assert_eq!(todo.title, "Buy milk");
        assert!(todo.completed);
    }

    #[rstest]
    #[case(r#"{"title":""}"#, "title")]
    #[case(r#"{"title":"  "}"#, "title")]
    #[case(r#"{"priority":"urgent"}"#, "priority")]
    fn invalid_patch_fields_are_rejected(#[case] body: &str, #[case] field: &str) {
        let patch: TodoPatch = serde_json::from_str(body).unwrap();
        assert!(patch.validate().unwrap_err().has_field(field));
    }

    #[rstest]
    #[case("title", TITLE_MAX_CHARS + 1)]
    #[case("description", DESCRIPTION_MAX_CHARS + 1)]
    fn oversized_patch_fields_are_rejected(#[case] field: &str, #[case] len: usize) {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), serde_json::Value::String("x".repeat(len)));
        let patch: TodoPatch = serde_json::from_value(serde_json::Value::Object(body)).unwrap();
        let err = patch.validate().unwrap_err();
        assert!(err.has_field(field));
        assert_eq!(err.errors().len(), 1);
    }

    #[test]
    fn patch_at_length_limits_is_accepted() {
        let patch = TodoPatch {
            title: Patch::Value("x".repeat(TITLE_MAX_CHARS)),
            description: Patch::Value("x".repeat(DESCRIPTION_MAX_CHARS)),
            ..TodoPatch::default()
        };
        assert!(patch.validate().is_ok());
    }
}
