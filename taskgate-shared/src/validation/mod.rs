/// Input validation
///
/// Raw request input (`serde_json::Value`) is checked against a declared
/// [`Shape`] before any domain logic runs. A shape lists named fields, each
/// with a [`Kind`], a [`Presence`] and a set of [`Rule`]s. Checking a
/// payload:
///
/// 1. rejects anything that is not a JSON object;
/// 2. rejects every property the shape does not declare (never dropped);
/// 3. per declared field, checks presence, type-checks, normalizes (trim,
///    lower-case, numeric strings to integers, ids and dates to canonical
///    form) and then applies the rules;
/// 4. aggregates every failure into one [`DomainError::ValidationFailed`].
///
/// The normalized object is then deserialized into the typed input, so
/// typed inputs only ever see clean values.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use taskgate_shared::validation::{inputs::TaskListQuery, validate};
///
/// let query: TaskListQuery = validate(json!({
///     "projectId": "0b6f1c9e-7a33-4c5e-9a3b-7f0e2f1b9d10",
///     "limit": "50",
/// }))
/// .unwrap();
///
/// assert_eq!(query.page, 1);
/// assert_eq!(query.limit, 50);
/// ```

pub mod inputs;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::DomainError;

/// Default page for paginated listings
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for paginated listings
pub const DEFAULT_LIMIT: i64 = 30;

/// Largest accepted page size; larger values are rejected
pub const MAX_LIMIT: i64 = 200;

/// Failure codes carried by [`FieldError`]
pub mod codes {
    pub const UNKNOWN_FIELD: &str = "UNKNOWN_FIELD";
    pub const REQUIRED: &str = "REQUIRED";
    pub const NOT_NULLABLE: &str = "NOT_NULLABLE";
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const INVALID_ID_FORMAT: &str = "INVALID_ID_FORMAT";
    pub const INVALID_EMAIL: &str = "INVALID_EMAIL";
    pub const INVALID_ENUM: &str = "INVALID_ENUM";
    pub const INVALID_DATE: &str = "INVALID_DATE";
    pub const TOO_SHORT: &str = "TOO_SHORT";
    pub const TOO_LONG: &str = "TOO_LONG";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const NOT_AN_INTEGER: &str = "NOT_AN_INTEGER";
}

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the offending field
    pub field: String,

    /// Stable failure code (see [`codes`])
    pub code: &'static str,

    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            message: message.into(),
        }
    }
}

/// Value kind of a declared field
#[derive(Debug, Clone, Copy)]
pub enum Kind {
    String,
    Integer,
    Id,
    IdList,
    Enum(&'static [&'static str]),
    Date,
}

/// What absence and `null` mean for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-null
    Required,

    /// May be absent; `null` is rejected
    Optional,

    /// May be absent; `null` is kept and means "clear"
    Nullable,

    /// May be absent, in which case the integer default is applied
    DefaultInt(i64),
}

/// Constraint applied after type-checking
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Trim surrounding whitespace (strings)
    Trim,

    /// Lower-case (strings)
    Lowercase,

    /// Reject the empty string
    NotEmpty,

    /// Minimum length in characters
    MinLength(usize),

    /// Maximum length in characters
    MaxLength(usize),

    /// Email address syntax
    Email,

    /// Minimum integer value
    Min(i64),

    /// Maximum integer value
    Max(i64),
}

/// Declared field of a shape
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: Kind,
    pub presence: Presence,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: Kind, presence: Presence, rules: &'static [Rule]) -> Self {
        Self {
            name,
            kind,
            presence,
            rules,
        }
    }
}

/// Closed set of fields accepted by an input
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

/// Typed input with a declared shape
pub trait Shaped: DeserializeOwned {
    const SHAPE: Shape;
}

/// Validates a raw payload and converts it into a typed input
///
/// # Errors
///
/// Returns [`DomainError::ValidationFailed`] carrying every violation
pub fn validate<T: Shaped>(raw: Value) -> Result<T, DomainError> {
    let normalized = T::SHAPE.check(raw).map_err(DomainError::ValidationFailed)?;

    serde_json::from_value(Value::Object(normalized)).map_err(|e| {
        tracing::warn!(shape = T::SHAPE.name, error = %e, "Normalized input failed to decode");
        DomainError::ValidationFailed(vec![FieldError::new(
            T::SHAPE.name,
            codes::INVALID_TYPE,
            format!("{} is malformed", T::SHAPE.name),
        )])
    })
}

impl Shape {
    /// Checks a payload, returning the normalized object or every failure
    pub fn check(&self, raw: Value) -> Result<Map<String, Value>, Vec<FieldError>> {
        let mut input = match raw {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(vec![FieldError::new(
                    "body",
                    codes::INVALID_TYPE,
                    "payload must be a JSON object",
                )])
            }
        };

        let mut errors = Vec::new();

        for key in input.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                errors.push(FieldError::new(
                    key,
                    codes::UNKNOWN_FIELD,
                    format!("property {} should not exist", key),
                ));
            }
        }

        let mut output = Map::new();
        for spec in self.fields {
            match check_field(spec, input.remove(spec.name)) {
                Ok(Some(value)) => {
                    output.insert(spec.name.to_string(), value);
                }
                Ok(None) => {}
                Err(mut field_errors) => errors.append(&mut field_errors),
            }
        }

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}

/// Deserializes a present field into `Some(value)`, keeping `null` as `Some(None)`
///
/// Combine with `#[serde(default)]` so an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_field(spec: &FieldSpec, value: Option<Value>) -> Result<Option<Value>, Vec<FieldError>> {
    let name = spec.name;

    let value = match (value, spec.presence) {
        (None, Presence::Required) => {
            return Err(vec![FieldError::new(
                name,
                codes::REQUIRED,
                format!("{} should not be empty", name),
            )])
        }
        (None, Presence::DefaultInt(default)) => return Ok(Some(Value::from(default))),
        (None, _) => return Ok(None),
        (Some(Value::Null), Presence::Nullable) => return Ok(Some(Value::Null)),
        (Some(Value::Null), _) => {
            return Err(vec![FieldError::new(
                name,
                codes::NOT_NULLABLE,
                format!("{} must not be null", name),
            )])
        }
        (Some(value), _) => value,
    };

    match spec.kind {
        Kind::String => check_string(spec, value),
        Kind::Integer => check_integer(spec, value),
        Kind::Id => parse_id(value.as_str()).map(Some).ok_or_else(|| vec![invalid_id(name)]),
        Kind::IdList => check_id_list(name, value),
        Kind::Enum(allowed) => {
            if value.as_str().map_or(false, |s| allowed.contains(&s)) {
                Ok(Some(value))
            } else {
                Err(vec![FieldError::new(
                    name,
                    codes::INVALID_ENUM,
                    format!("{} must be one of the following values: {}", name, allowed.join(", ")),
                )])
            }
        }
        Kind::Date => value
            .as_str()
            .and_then(parse_date)
            .map(|date| Some(Value::String(date.to_rfc3339_opts(SecondsFormat::Millis, true))))
            .ok_or_else(|| {
                vec![FieldError::new(
                    name,
                    codes::INVALID_DATE,
                    format!("{} must be ISO-8601 (e.g. 2025-01-31T10:00:00Z)", name),
                )]
            }),
    }
}

fn check_string(spec: &FieldSpec, value: Value) -> Result<Option<Value>, Vec<FieldError>> {
    let name = spec.name;
    let Value::String(mut s) = value else {
        return Err(vec![FieldError::new(
            name,
            codes::INVALID_TYPE,
            format!("{} must be a string", name),
        )]);
    };

    for rule in spec.rules {
        match rule {
            Rule::Trim => s = s.trim().to_string(),
            Rule::Lowercase => s = s.to_lowercase(),
            _ => {}
        }
    }

    let mut errors = Vec::new();
    let len = s.chars().count();
    for rule in spec.rules {
        match *rule {
            Rule::NotEmpty if s.is_empty() => errors.push(FieldError::new(
                name,
                codes::REQUIRED,
                format!("{} should not be empty", name),
            )),
            Rule::MinLength(min) if len < min => errors.push(FieldError::new(
                name,
                codes::TOO_SHORT,
                format!("{} must be longer than or equal to {} characters", name, min),
            )),
            Rule::MaxLength(max) if len > max => errors.push(FieldError::new(
                name,
                codes::TOO_LONG,
                format!("{} must be shorter than or equal to {} characters", name, max),
            )),
            Rule::Email if !s.validate_email() => errors.push(FieldError::new(
                name,
                codes::INVALID_EMAIL,
                format!("{} must be an email", name),
            )),
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(Some(Value::String(s)))
    } else {
        Err(errors)
    }
}

fn check_integer(spec: &FieldSpec, value: Value) -> Result<Option<Value>, Vec<FieldError>> {
    let name = spec.name;
    let parsed = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    let Some(n) = parsed else {
        return Err(vec![FieldError::new(
            name,
            codes::NOT_AN_INTEGER,
            format!("{} must be an integer number", name),
        )]);
    };

    let mut errors = Vec::new();
    for rule in spec.rules {
        match *rule {
            Rule::Min(min) if n < min => errors.push(FieldError::new(
                name,
                codes::OUT_OF_RANGE,
                format!("{} must not be less than {}", name, min),
            )),
            Rule::Max(max) if n > max => errors.push(FieldError::new(
                name,
                codes::OUT_OF_RANGE,
                format!("{} must not be greater than {}", name, max),
            )),
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(Some(Value::from(n)))
    } else {
        Err(errors)
    }
}

fn check_id_list(name: &str, value: Value) -> Result<Option<Value>, Vec<FieldError>> {
    let Value::Array(items) = value else {
        return Err(vec![FieldError::new(
            name,
            codes::INVALID_TYPE,
            format!("{} must be an array", name),
        )]);
    };

    let mut ids = Vec::with_capacity(items.len());
    for item in &items {
        match parse_id(item.as_str()) {
            Some(id) => ids.push(id),
            None => return Err(vec![invalid_id(name)]),
        }
    }

    Ok(Some(Value::Array(ids)))
}

fn invalid_id(name: &str) -> FieldError {
    FieldError::new(name, codes::INVALID_ID_FORMAT, format!("Invalid {} format", name))
}

fn parse_id(raw: Option<&str>) -> Option<Value> {
    let id = Uuid::parse_str(raw?.trim()).ok()?;
    Some(Value::String(id.hyphenated().to_string()))
}

/// Parses ISO-8601 date or date-time input; offset-less values are UTC
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROBE: Shape = Shape {
        name: "Probe",
        fields: &[
            FieldSpec::new("name", Kind::String, Presence::Required, &[Rule::Trim, Rule::NotEmpty, Rule::MaxLength(5)]),
            FieldSpec::new("email", Kind::String, Presence::Optional, &[Rule::Trim, Rule::Lowercase, Rule::Email]),
            FieldSpec::new("limit", Kind::Integer, Presence::DefaultInt(30), &[Rule::Min(1), Rule::Max(200)]),
            FieldSpec::new("note", Kind::String, Presence::Nullable, &[Rule::Trim]),
            FieldSpec::new("color", Kind::Enum(&["RED", "BLUE"]), Presence::Optional, &[]),
            FieldSpec::new("ownerId", Kind::Id, Presence::Optional, &[]),
            FieldSpec::new("members", Kind::IdList, Presence::Optional, &[]),
            FieldSpec::new("due", Kind::Date, Presence::Optional, &[]),
        ],
    };

    fn codes_of(result: Result<Map<String, Value>, Vec<FieldError>>) -> Vec<(String, &'static str)> {
        result
            .unwrap_err()
            .into_iter()
            .map(|e| (e.field, e.code))
            .collect()
    }

    #[test]
    fn test_normalizes_and_applies_defaults() {
        let out = PROBE
            .check(json!({ "name": "  ada ", "email": " Ada@Example.COM " }))
            .unwrap();

        assert_eq!(out["name"], "ada");
        assert_eq!(out["email"], "ada@example.com");
        assert_eq!(out["limit"], 30);
        assert!(!out.contains_key("note"));
    }

    #[test]
    fn test_rejects_non_object() {
        let errors = PROBE.check(json!([1, 2])).unwrap_err();
        assert_eq!(errors[0].code, codes::INVALID_TYPE);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let errors = PROBE.check(json!({ "name": "ada", "isAdmin": true })).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::UNKNOWN_FIELD);
        assert_eq!(errors[0].message, "property isAdmin should not exist");
    }

    #[test]
    fn test_errors_are_aggregated() {
        let found = codes_of(PROBE.check(json!({
            "name": "   ",
            "email": "nope",
            "limit": 500,
            "color": "GREEN",
            "ownerId": "123",
            "due": "tomorrow",
        })));

        assert_eq!(
            found,
            vec![
                ("name".to_string(), codes::REQUIRED),
                ("email".to_string(), codes::INVALID_EMAIL),
                ("limit".to_string(), codes::OUT_OF_RANGE),
                ("color".to_string(), codes::INVALID_ENUM),
                ("ownerId".to_string(), codes::INVALID_ID_FORMAT),
                ("due".to_string(), codes::INVALID_DATE),
            ]
        );
    }

    #[test]
    fn test_missing_required() {
        let errors = PROBE.check(json!({})).unwrap_err();
        assert_eq!(errors, vec![FieldError::new("name", codes::REQUIRED, "name should not be empty")]);
    }

    #[test]
    fn test_null_handling() {
        let out = PROBE.check(json!({ "name": "a", "note": null })).unwrap();
        assert_eq!(out["note"], Value::Null);

        let errors = PROBE.check(json!({ "name": "a", "email": null })).unwrap_err();
        assert_eq!(errors[0].code, codes::NOT_NULLABLE);
    }

    #[test]
    fn test_integer_from_string() {
        let out = PROBE.check(json!({ "name": "a", "limit": "200" })).unwrap();
        assert_eq!(out["limit"], 200);

        let errors = PROBE.check(json!({ "name": "a", "limit": "abc" })).unwrap_err();
        assert_eq!(errors[0].code, codes::NOT_AN_INTEGER);

        let errors = PROBE.check(json!({ "name": "a", "limit": 2.5 })).unwrap_err();
        assert_eq!(errors[0].code, codes::NOT_AN_INTEGER);
    }

    #[test]
    fn test_limit_bounds_messages() {
        let errors = PROBE.check(json!({ "name": "a", "limit": 201 })).unwrap_err();
        assert_eq!(errors[0].message, "limit must not be greater than 200");

        let errors = PROBE.check(json!({ "name": "a", "limit": 0 })).unwrap_err();
        assert_eq!(errors[0].message, "limit must not be less than 1");
    }

    #[test]
    fn test_string_length() {
        let errors = PROBE.check(json!({ "name": "abcdef" })).unwrap_err();
        assert_eq!(errors[0].code, codes::TOO_LONG);
        assert_eq!(errors[0].message, "name must be shorter than or equal to 5 characters");

        let errors = PROBE.check(json!({ "name": 42 })).unwrap_err();
        assert_eq!(errors[0].code, codes::INVALID_TYPE);
    }

    #[test]
    fn test_id_message_and_normalization() {
        let errors = PROBE.check(json!({ "name": "a", "ownerId": "not-an-id" })).unwrap_err();
        assert_eq!(errors[0].message, "Invalid ownerId format");

        let id = Uuid::new_v4();
        let out = PROBE
            .check(json!({ "name": "a", "ownerId": id.simple().to_string() }))
            .unwrap();
        assert_eq!(out["ownerId"], id.hyphenated().to_string());
    }

    #[test]
    fn test_id_list() {
        let id = Uuid::new_v4();
        let out = PROBE.check(json!({ "name": "a", "members": [id.to_string()] })).unwrap();
        assert_eq!(out["members"], json!([id.to_string()]));

        let errors = PROBE.check(json!({ "name": "a", "members": [id.to_string(), "x"] })).unwrap_err();
        assert_eq!(errors[0].code, codes::INVALID_ID_FORMAT);

        let errors = PROBE.check(json!({ "name": "a", "members": "x" })).unwrap_err();
        assert_eq!(errors[0].code, codes::INVALID_TYPE);
    }

    #[test]
    fn test_enum_message() {
        let errors = PROBE.check(json!({ "name": "a", "color": "red" })).unwrap_err();
        assert_eq!(errors[0].message, "color must be one of the following values: RED, BLUE");
    }

    #[test]
    fn test_parse_date_forms() {
        let expected = "2025-01-31T10:00:00Z".parse::<DateTime<Utc>>().unwrap();

        assert_eq!(parse_date("2025-01-31T10:00:00Z"), Some(expected));
        assert_eq!(parse_date("2025-01-31T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_date("2025-01-31T10:00:00"), Some(expected));
        assert_eq!(parse_date("2025-01-31T10:00"), Some(expected));
        assert_eq!(
            parse_date("2025-01-31"),
            Some("2025-01-31T00:00:00Z".parse::<DateTime<Utc>>().unwrap())
        );
        assert_eq!(parse_date("2025-13-01"), None);
        assert_eq!(parse_date("31/01/2025"), None);
    }

    #[test]
    fn test_date_is_normalized() {
        let out = PROBE.check(json!({ "name": "a", "due": "2025-01-31" })).unwrap();
        assert_eq!(out["due"], "2025-01-31T00:00:00.000Z");
    }
}
