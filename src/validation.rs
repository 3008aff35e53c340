//! Request schemas for the write endpoints.
//!
//! Bodies are first deserialized into loosely typed request structs so that
//! missing fields and out-of-range enum values are reported per field
//! instead of as a single deserialization failure. Successful validation
//! yields the normalized [`NewIncident`] / [`IncidentPatch`] payloads; any
//! unrecognized JSON keys are dropped at deserialization.

use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::str::FromStr;
use strum::IntoEnumIterator;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, FieldErrors, Result};
use crate::models::{IncidentPatch, IncidentStatus, NewIncident, Severity};

/// Full schema, used on create
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateIncidentRequest {
    #[validate(required(message = "Title is required"), custom(function = "validate_title"))]
    pub title: Option<String>,

    #[validate(required(message = "Service is required"), custom(function = "validate_service"))]
    pub service: Option<String>,

    #[validate(required(message = "Severity is required"), custom(function = "validate_severity"))]
    pub severity: Option<String>,

    #[validate(required(message = "Status is required"), custom(function = "validate_status"))]
    pub status: Option<String>,

    pub owner: Option<String>,

    pub summary: Option<String>,
}

impl CreateIncidentRequest {
    /// Validate and normalize into a store-ready payload
    pub fn into_new_incident(self) -> Result<NewIncident> {
        self.validate()?;

        let title = required(self.title, "title")?;
        let service = required(self.service, "service")?;
        let severity = parse_enum::<Severity>(&required(self.severity, "severity")?, "severity")?;
        let status = parse_enum::<IncidentStatus>(&required(self.status, "status")?, "status")?;

        Ok(NewIncident {
            title,
            service,
            severity,
            status,
            owner: self.owner,
            summary: self.summary,
        })
    }
}

/// Partial schema, used on update.
///
/// The outer option records whether the key was present in the body at all,
/// the inner one whether it was `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIncidentRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub service: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub severity: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub owner: Option<Option<String>>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub summary: Option<Option<String>>,
}

impl Validate for UpdateIncidentRequest {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_present(&mut errors, "title", &self.title, validate_title);
        check_present(&mut errors, "service", &self.service, validate_service);
        check_present(&mut errors, "severity", &self.severity, validate_severity);
        check_present(&mut errors, "status", &self.status, validate_status);

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UpdateIncidentRequest {
    /// Validate and normalize into a patch
    pub fn into_patch(self) -> Result<IncidentPatch> {
        self.validate()?;

        let severity = match self.severity.flatten() {
            Some(value) => Some(parse_enum::<Severity>(&value, "severity")?),
            None => None,
        };
        let status = match self.status.flatten() {
            Some(value) => Some(parse_enum::<IncidentStatus>(&value, "status")?),
            None => None,
        };

        Ok(IncidentPatch {
            title: self.title.flatten(),
            service: self.service.flatten(),
            severity,
            status,
            owner: self.owner,
            summary: self.summary,
        })
    }
}

fn check_present(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<Option<String>>,
    rule: fn(&str) -> std::result::Result<(), ValidationError>,
) {
    match value {
        None => {}
        Some(None) => errors.add(field, message_error("null", format!("{} cannot be null", field))),
        Some(Some(inner)) => {
            if let Err(error) = rule(inner) {
                errors.add(field, error);
            }
        }
    }
}

fn validate_title(value: &str) -> std::result::Result<(), ValidationError> {
    non_empty(value, "Title is required")
}

fn validate_service(value: &str) -> std::result::Result<(), ValidationError> {
    non_empty(value, "Service is required")
}

fn validate_severity(value: &str) -> std::result::Result<(), ValidationError> {
    one_of::<Severity>(value)
}

fn validate_status(value: &str) -> std::result::Result<(), ValidationError> {
    one_of::<IncidentStatus>(value)
}

fn non_empty(value: &str, message: &'static str) -> std::result::Result<(), ValidationError> {
    if value.is_empty() {
        Err(message_error("length", message))
    } else {
        Ok(())
    }
}

fn one_of<E>(value: &str) -> std::result::Result<(), ValidationError>
where
    E: FromStr + IntoEnumIterator + std::fmt::Display,
{
    if E::from_str(value).is_ok() {
        Ok(())
    } else {
        Err(message_error("enum", expected_one_of::<E>(value)))
    }
}

/// "Invalid value 'X', expected one of A, B, C"
pub fn expected_one_of<E>(value: &str) -> String
where
    E: IntoEnumIterator + std::fmt::Display,
{
    let allowed: Vec<String> = E::iter().map(|v| v.to_string()).collect();
    format!("Invalid value '{}', expected one of {}", value, allowed.join(", "))
}

fn message_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value.ok_or_else(|| AppError::Validation(FieldErrors::single(field, "Required")))
}

fn parse_enum<E>(value: &str, field: &str) -> Result<E>
where
    E: FromStr + IntoEnumIterator + std::fmt::Display,
{
    E::from_str(value)
        .map_err(|_| AppError::Validation(FieldErrors::single(field, expected_one_of::<E>(value))))
}

/// Wraps any present value, including `null`, in `Some`
fn deserialize_present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_request(body: serde_json::Value) -> CreateIncidentRequest {
        serde_json::from_value(body).unwrap()
    }

    fn update_request(body: serde_json::Value) -> UpdateIncidentRequest {
        serde_json::from_value(body).unwrap()
    }

    fn fields_of(err: AppError) -> FieldErrors {
        match err {
            AppError::Validation(fields) => fields,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_create_payload() {
        let payload = create_request(json!({
            "title": "Checkout errors",
            "service": "Payments",
            "severity": "SEV1",
            "status": "OPEN",
            "owner": null,
            "summary": "5xx spike on /checkout",
            "id": "ignored",
            "unexpected": true
        }))
        .into_new_incident()
        .unwrap();

        assert_eq!(payload.title, "Checkout errors");
        assert_eq!(payload.severity, Severity::Sev1);
        assert_eq!(payload.status, IncidentStatus::Open);
        assert_eq!(payload.owner, None);
        assert_eq!(payload.summary.as_deref(), Some("5xx spike on /checkout"));
    }

    #[test]
    fn test_create_reports_every_bad_field() {
        let err = create_request(json!({
            "title": "",
            "severity": "SEV9",
            "status": "OPEN"
        }))
        .into_new_incident()
        .unwrap_err();

        let fields = fields_of(err);
        assert_eq!(fields.get("title").unwrap(), ["Title is required"]);
        assert_eq!(fields.get("service").unwrap(), ["Service is required"]);
        assert!(fields.get("severity").unwrap()[0].contains("SEV1, SEV2, SEV3, SEV4"));
        assert!(fields.get("status").is_none());
    }

    #[test]
    fn test_create_accepts_single_character_title() {
        let payload = create_request(json!({
            "title": "x",
            "service": "Auth",
            "severity": "SEV4",
            "status": "RESOLVED"
        }))
        .into_new_incident()
        .unwrap();

        assert_eq!(payload.title, "x");
        assert_eq!(payload.status, IncidentStatus::Resolved);
    }

    #[test]
    fn test_empty_patch_is_valid() {
        let patch = update_request(json!({})).into_patch().unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_distinguishes_absent_and_null() {
        let patch = update_request(json!({ "owner": null, "status": "RESOLVED" }))
            .into_patch()
            .unwrap();

        assert_eq!(patch.owner, Some(None));
        assert_eq!(patch.summary, None);
        assert_eq!(patch.status, Some(IncidentStatus::Resolved));
        assert_eq!(patch.title, None);
    }

    #[test]
    fn test_patch_applies_per_field_rules() {
        let err = update_request(json!({ "title": "", "severity": "sev1", "service": null }))
            .into_patch()
            .unwrap_err();

        let fields = fields_of(err);
        assert_eq!(fields.get("title").unwrap(), ["Title is required"]);
        assert_eq!(fields.get("service").unwrap(), ["service cannot be null"]);
        assert!(fields.get("severity").is_some());
    }

    #[test]
    fn test_expected_one_of_lists_variants() {
        assert_eq!(
            expected_one_of::<IncidentStatus>("DONE"),
            "Invalid value 'DONE', expected one of OPEN, MITIGATED, RESOLVED"
        );
    }
}
