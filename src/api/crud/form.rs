use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use super::state::EditorMode;
use crate::models::schema::{FieldKind, FieldSpec, Requirement};

/// String values of an editor form, keyed by field name.
///
/// Values stay exactly as typed so a failed submission can be re-rendered
/// unchanged; conversion to the wire payload happens in [`FormState::to_payload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: HashMap<String, String>,
}

impl FormState {
    pub fn defaults(fields: &[FieldSpec]) -> Self {
        let values = fields
            .iter()
            .map(|f| (f.name.to_string(), f.default.to_string()))
            .collect();
        Self { values }
    }

    /// Populates the form from an existing record. Dates are cut down to
    /// `YYYY-MM-DD` and passwords are never pre-filled.
    pub fn from_record<R: Serialize>(fields: &[FieldSpec], record: &R) -> Self {
        let data = serde_json::to_value(record).unwrap_or(Value::Null);

        let values = fields
            .iter()
            .map(|f| {
                let value = match (f.kind, data.get(f.name)) {
                    (FieldKind::Password, _) => String::new(),
                    (_, None) | (_, Some(Value::Null)) => String::new(),
                    (FieldKind::Date, Some(Value::String(s))) => date_part(s).to_string(),
                    (FieldKind::Checkbox, Some(Value::Bool(b))) => {
                        (if *b { "true" } else { "" }).to_string()
                    }
                    (_, Some(Value::String(s))) => s.clone(),
                    (_, Some(other)) => other.to_string(),
                };
                (f.name.to_string(), value)
            })
            .collect();

        Self { values }
    }

    /// Builds the form from submitted `name=value` pairs. Unchecked checkboxes
    /// are absent from a browser submission and read as empty.
    pub fn from_submission(fields: &[FieldSpec], pairs: Vec<(String, String)>) -> Self {
        let mut submitted: HashMap<String, String> = HashMap::new();
        for (name, value) in pairs {
            submitted.insert(name, value);
        }

        let values = fields
            .iter()
            .map(|f| {
                let raw = submitted.remove(f.name).unwrap_or_default();
                let value = match f.kind {
                    FieldKind::Checkbox if !raw.is_empty() => "true".to_string(),
                    _ => raw,
                };
                (f.name.to_string(), value)
            })
            .collect();

        Self { values }
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_checked(&self, name: &str) -> bool {
        matches!(self.get(name), "true" | "on" | "1")
    }

    /// Converts the form into the JSON payload for create or update.
    ///
    /// Returns the user-facing message of the first field that fails
    /// validation.
    pub fn to_payload(&self, fields: &[FieldSpec], mode: &EditorMode) -> Result<Value, String> {
        let mut payload = Map::new();

        for field in fields {
            let raw = self.get(field.name).trim();

            let required = match field.required {
                Requirement::Always => true,
                Requirement::OnCreate => *mode == EditorMode::Create,
                Requirement::Optional => false,
            };
            if required && raw.is_empty() && field.kind != FieldKind::Checkbox {
                return Err(format!("Vui lòng nhập {}", field.label));
            }

            let value = match field.kind {
                FieldKind::Checkbox => Value::Bool(self.is_checked(field.name)),
                // Left empty on edit: keep the current password
                FieldKind::Password if raw.is_empty() => continue,
                _ if raw.is_empty() => Value::Null,
                _ if field.integer => {
                    let n: i64 = raw
                        .parse()
                        .map_err(|_| format!("{} phải là số nguyên", field.label))?;
                    if let Some(min) = field.min {
                        if n < min {
                            return Err(format!("{} phải lớn hơn hoặc bằng {}", field.label, min));
                        }
                    }
                    Value::Number(Number::from(n))
                }
                _ => Value::String(raw.to_string()),
            };

            payload.insert(field.name.to_string(), value);
        }

        Ok(Value::Object(payload))
    }
}

/// Leading `YYYY-MM-DD` of a date or timestamp string
fn date_part(value: &str) -> &str {
    value
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{OptionSource, Resource};
    use crate::models::{Course, Student, User};
    use serde_json::json;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("code", "Mã").required(),
        FieldSpec::text("faculty_id", "Khoa")
            .kind(FieldKind::Select(OptionSource::Faculties))
            .integer(),
        FieldSpec::text("note", "Ghi chú"),
        FieldSpec::text("is_active", "Kích hoạt")
            .kind(FieldKind::Checkbox)
            .default_value("true"),
    ];

    fn submit(pairs: &[(&str, &str)]) -> FormState {
        FormState::from_submission(
            FIELDS,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults_come_from_schema() {
        let form = FormState::defaults(FIELDS);
        assert_eq!(form.get("code"), "");
        assert!(form.is_checked("is_active"));
    }

    #[test]
    fn test_payload_converts_integers_nulls_and_checkboxes() {
        let form = submit(&[("code", "CNTT"), ("faculty_id", "3"), ("note", "")]);
        let payload = form.to_payload(FIELDS, &EditorMode::Create).unwrap();
        assert_eq!(
            payload,
            json!({"code": "CNTT", "faculty_id": 3, "note": null, "is_active": false})
        );
    }

    #[test]
    fn test_empty_integer_becomes_null() {
        let form = submit(&[("code", "CNTT"), ("faculty_id", ""), ("is_active", "on")]);
        let payload = form.to_payload(FIELDS, &EditorMode::Create).unwrap();
        assert_eq!(payload["faculty_id"], Value::Null);
        assert_eq!(payload["is_active"], Value::Bool(true));
    }

    #[test]
    fn test_missing_required_field_names_label() {
        let form = submit(&[("code", "   ")]);
        let err = form.to_payload(FIELDS, &EditorMode::Create).unwrap_err();
        assert_eq!(err, "Vui lòng nhập Mã");
    }

    #[test]
    fn test_non_numeric_integer_is_rejected() {
        let form = submit(&[("code", "X"), ("faculty_id", "abc")]);
        assert!(form.to_payload(FIELDS, &EditorMode::Create).is_err());
    }

    #[test]
    fn test_course_credits_must_be_positive() {
        let fields = Course::schema().fields;
        let form = FormState::from_submission(
            fields,
            vec![
                ("code".to_string(), "IT01".to_string()),
                ("name".to_string(), "Nhập môn".to_string()),
                ("credits".to_string(), "0".to_string()),
            ],
        );
        assert!(form.to_payload(fields, &EditorMode::Create).is_err());
    }

    #[test]
    fn test_password_required_on_create_only() {
        let fields = User::schema().fields;
        let form = FormState::from_submission(
            fields,
            vec![
                ("username".to_string(), "gv01".to_string()),
                ("display_name".to_string(), "Giảng viên".to_string()),
                ("role".to_string(), "staff".to_string()),
            ],
        );

        let err = form.to_payload(fields, &EditorMode::Create).unwrap_err();
        assert_eq!(err, "Vui lòng nhập Mật khẩu");

        let payload = form.to_payload(fields, &EditorMode::Edit(4)).unwrap();
        assert!(payload.get("password").is_none());
        assert_eq!(payload["is_active"], Value::Bool(false));
    }

    #[test]
    fn test_from_record_truncates_dates() {
        let student: Student = serde_json::from_value(json!({
            "id": 1,
            "code": "SV01",
            "name": "An",
            "birth_date": "2003-05-17T00:00:00.000Z",
            "class_id": 2
        }))
        .unwrap();

        let form = FormState::from_record(Student::schema().fields, &student);
        assert_eq!(form.get("birth_date"), "2003-05-17");
        assert_eq!(form.get("class_id"), "2");
        assert_eq!(form.get("email"), "");
    }

    #[test]
    fn test_submitted_values_survive_unchanged() {
        let form = submit(&[("code", "  CNTT "), ("note", "ghi chú")]);
        assert_eq!(form.get("code"), "  CNTT ");
        assert_eq!(form.get("note"), "ghi chú");
    }
}
