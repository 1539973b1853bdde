//! Domain types for the student roster.
//!
//! Wire field names are camelCase to match the service's JSON contract.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Group id applied when a request does not name one.
pub const DEFAULT_GROUP_ID: i64 = 1;

/// A student as stored by the service and held in the client cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
  /// Server-assigned, immutable once created. Temporary client-side
  /// entries use negative ids; the server only ever assigns positive ones.
  pub id: i64,
  pub first_name: String,
  pub last_name: String,
  pub middle_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contacts: Option<String>,
  #[serde(default = "default_group_id")]
  pub group_id: i64,
  /// Set while a delete of this entry is in flight. UI feedback only,
  /// never serialized or persisted.
  #[serde(skip)]
  pub is_deleted: bool,
}

fn default_group_id() -> i64 {
  DEFAULT_GROUP_ID
}

impl Student {
  /// Whether this entry is a not-yet-persisted optimistic placeholder.
  pub fn is_pending(&self) -> bool {
    self.id < 0
  }

  /// "Lastname Firstname Middlename" for list rendering.
  pub fn full_name(&self) -> String {
    format!("{} {} {}", self.last_name, self.first_name, self.middle_name)
  }
}

/// Fields for creating a student. The id is assigned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  #[serde(default)]
  pub middle_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contacts: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub group_id: Option<i64>,
}

impl NewStudent {
  /// Check the required name fields. Whitespace-only counts as missing.
  pub fn validate(&self) -> Result<(), ValidationError> {
    for (field, value) in [
      ("firstName", &self.first_name),
      ("lastName", &self.last_name),
      ("middleName", &self.middle_name),
    ] {
      if value.trim().is_empty() {
        return Err(ValidationError { field });
      }
    }
    Ok(())
  }

  /// The group id this request resolves to.
  pub fn group_id_or_default(&self) -> i64 {
    self.group_id.unwrap_or(DEFAULT_GROUP_ID)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> NewStudent {
    NewStudent {
      first_name: "Anna".into(),
      last_name: "Petrova".into(),
      middle_name: "Ivanovna".into(),
      ..Default::default()
    }
  }

  #[test]
  fn test_validate_accepts_complete_names() {
    assert!(valid().validate().is_ok());
  }

  #[test]
  fn test_validate_rejects_missing_field() {
    let mut new = valid();
    new.middle_name = String::new();
    assert_eq!(new.validate().unwrap_err().field, "middleName");
  }

  #[test]
  fn test_validate_rejects_whitespace_only() {
    let mut new = valid();
    new.first_name = "   ".into();
    assert_eq!(new.validate().unwrap_err().field, "firstName");
  }

  #[test]
  fn test_group_id_defaults_to_one() {
    assert_eq!(valid().group_id_or_default(), 1);
    let mut new = valid();
    new.group_id = Some(3);
    assert_eq!(new.group_id_or_default(), 3);
  }

  #[test]
  fn test_student_wire_names_are_camel_case() {
    let student = Student {
      id: 7,
      first_name: "Anna".into(),
      last_name: "Petrova".into(),
      middle_name: "Ivanovna".into(),
      contacts: None,
      group_id: 2,
      is_deleted: true,
    };

    let json = serde_json::to_value(&student).unwrap();
    assert_eq!(json["firstName"], "Anna");
    assert_eq!(json["groupId"], 2);
    // Transient flag never crosses the wire
    assert!(json.get("isDeleted").is_none());
  }

  #[test]
  fn test_student_decodes_without_optional_fields() {
    let student: Student =
      serde_json::from_str(r#"{"id":1,"firstName":"A","lastName":"B","middleName":"C"}"#).unwrap();
    assert_eq!(student.group_id, DEFAULT_GROUP_ID);
    assert_eq!(student.contacts, None);
    assert!(!student.is_deleted);
  }
}
