//! Practice details, documents and specializations
#![allow(clippy::must_use_candidate)] // Plain accessors; callers routinely ignore results in builders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Contact and location details for the practice
///
/// Nothing here is required by the type itself; required-ness is declared by
/// the validation rule tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeInfo {
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub phone_number: String,
    pub email: String,
}

impl PracticeInfo {
    /// Read a field by its camelCase name.
    ///
    /// Returns `None` for unknown names and for an unset `middleName`.
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "firstName" => Some(&self.first_name),
            "middleName" => self.middle_name.as_deref(),
            "lastName" => Some(&self.last_name),
            "country" => Some(&self.country),
            "state" => Some(&self.state),
            "city" => Some(&self.city),
            "phoneNumber" => Some(&self.phone_number),
            "email" => Some(&self.email),
            _ => None,
        }
    }

    /// Write a field by its camelCase name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] when `field` is not a practice field.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        match field {
            "firstName" => self.first_name = value,
            "middleName" => self.middle_name = if value.is_empty() { None } else { Some(value) },
            "lastName" => self.last_name = value,
            "country" => self.country = value,
            "state" => self.state = value,
            "city" => self.city = value,
            "phoneNumber" => self.phone_number = value,
            "email" => self.email = value,
            other => return Err(Error::unknown_field(other)),
        }
        Ok(())
    }
}

/// Upload lifecycle of a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Completed,
    Error,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Completed => "completed",
            UploadStatus::Error => "error",
        }
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UploadStatus::Pending),
            "uploading" => Ok(UploadStatus::Uploading),
            "completed" => Ok(UploadStatus::Completed),
            "error" => Ok(UploadStatus::Error),
            other => Err(Error::UnknownUploadStatus(other.to_string())),
        }
    }
}

/// An uploaded (or uploading) supporting document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentRecord {
    pub id: String,
    /// Document kind, e.g. `license`
    #[serde(rename = "type")]
    pub doc_type: String,
    pub original_name: String,
    pub url: String,
    pub public_id: String,
    pub upload_status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
}

impl DocumentRecord {
    /// Create a pending document record
    pub fn new(id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            doc_type: doc_type.into(),
            ..Self::default()
        }
    }

    /// Set the original file name
    #[must_use]
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = name.into();
        self
    }

    /// Set the upload status
    #[must_use]
    pub fn with_status(mut self, status: UploadStatus) -> Self {
        self.upload_status = status;
        self
    }

    /// Attach validation errors reported by the upload service
    #[must_use]
    pub fn with_validation_errors(mut self, errors: Vec<String>) -> Self {
        self.validation_errors = Some(errors);
        self
    }

    pub fn is_uploaded(&self) -> bool {
        self.upload_status == UploadStatus::Completed
    }

    pub fn has_validation_errors(&self) -> bool {
        self.validation_errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// A declared area of practice
///
/// Both fields are optional so that partially filled rows from the form can be
/// represented and reported on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecializationEntry {
    /// Reference into the external specialization catalog
    pub specialization_id: Option<String>,
    pub years_of_experience: Option<f64>,
}

impl SpecializationEntry {
    pub fn new(specialization_id: impl Into<String>, years_of_experience: f64) -> Self {
        Self {
            specialization_id: Some(specialization_id.into()),
            years_of_experience: Some(years_of_experience),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_practice_info_get_and_set() {
        let mut info = PracticeInfo::default();
        info.set("firstName", "Ada").unwrap();
        info.set("phoneNumber", "+2348012345678").unwrap();
        assert_eq!(info.get("firstName"), Some("Ada"));
        assert_eq!(info.get("phoneNumber"), Some("+2348012345678"));
        assert_eq!(info.get("middleName"), None);
        assert_eq!(info.get("fax"), None);

        info.set("middleName", "Lovelace").unwrap();
        assert_eq!(info.get("middleName"), Some("Lovelace"));
        info.set("middleName", "").unwrap();
        assert_eq!(info.middle_name, None);

        assert_eq!(info.set("fax", "123"), Err(Error::unknown_field("fax")));
    }

    #[test]
    fn test_practice_info_deserializes_partial_camel_case() {
        let info: PracticeInfo =
            serde_json::from_str(r#"{"firstName":"John","phoneNumber":"+1234567890"}"#).unwrap();
        assert_eq!(info.first_name, "John");
        assert_eq!(info.phone_number, "+1234567890");
        assert!(info.last_name.is_empty());
    }

    #[test]
    fn test_document_upload_and_error_flags() {
        let doc = DocumentRecord::new("d1", "license").with_status(UploadStatus::Completed);
        assert!(doc.is_uploaded());
        assert!(!doc.has_validation_errors());

        let empty_errors = doc.clone().with_validation_errors(Vec::new());
        assert!(!empty_errors.has_validation_errors());

        let flagged = doc.with_validation_errors(vec!["blurry scan".to_string()]);
        assert!(flagged.is_uploaded());
        assert!(flagged.has_validation_errors());

        let uploading = DocumentRecord::new("d2", "license").with_status(UploadStatus::Uploading);
        assert!(!uploading.is_uploaded());
    }

    #[test]
    fn test_document_wire_format() {
        let doc: DocumentRecord = serde_json::from_str(
            r#"{"id":"d1","type":"license","originalName":"bar.pdf","uploadStatus":"error"}"#,
        )
        .unwrap();
        assert_eq!(doc.doc_type, "license");
        assert_eq!(doc.original_name, "bar.pdf");
        assert_eq!(doc.upload_status, UploadStatus::Error);
        assert_eq!(doc.validation_errors, None);
    }

    #[test]
    fn test_upload_status_from_str() {
        assert_eq!("uploading".parse::<UploadStatus>().unwrap(), UploadStatus::Uploading);
        assert!("done".parse::<UploadStatus>().is_err());
    }

    #[test]
    fn test_specialization_null_experience() {
        let entry: SpecializationEntry =
            serde_json::from_str(r#"{"specializationId":"tax","yearsOfExperience":null}"#).unwrap();
        assert_eq!(entry.specialization_id.as_deref(), Some("tax"));
        assert_eq!(entry.years_of_experience, None);
    }
}
