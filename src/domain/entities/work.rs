use std::{borrow::Cow, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

use crate::errors::AppError;

/// Untyped front-matter record, as parsed from YAML or received as JSON.
pub type RawRecord = Map<String, Value>;

// ───── Constants ──────────────────────────────────────────────────────
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%#z", "%Y-%m-%d %H:%M%#z"];

// ───── Enumerations ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Personal,
    Work,
}

impl Category {
    pub const VARIANTS: [&'static str; 2] = ["Personal", "Work"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "Personal",
            Category::Work => "Work",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Personal" => Ok(Category::Personal),
            "Work" => Ok(Category::Work),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Live,
    Archived,
    InDevelopment,
}

impl Status {
    pub const VARIANTS: [&'static str; 3] = ["live", "archived", "in_development"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Live => "live",
            Status::Archived => "archived",
            Status::InDevelopment => "in_development",
        }
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(Status::Live),
            "archived" => Ok(Status::Archived),
            "in_development" => Ok(Status::InDevelopment),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ───── Validated Model ───────────────────────────────────────────────

/// A validated entry of the `work` content collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub title: String,
    pub description: String,
    #[serde(rename = "publishDate")]
    pub publish_date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub img: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_alt: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// Validates a raw record, returning every violation as an `AppError`.
pub fn validate_work_item(raw: &RawRecord) -> Result<WorkItem, AppError> {
    Ok(WorkItem::try_from(raw)?)
}

impl TryFrom<RawRecord> for WorkItem {
    type Error = ValidationErrors;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        WorkItem::try_from(&raw)
    }
}

impl TryFrom<&RawRecord> for WorkItem {
    type Error = ValidationErrors;

    fn try_from(raw: &RawRecord) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let title = collect(&mut errors, "title", required(raw, "title").and_then(expect_string));
        let description = collect(
            &mut errors,
            "description",
            required(raw, "description").and_then(expect_string),
        );
        let publish_date = collect(
            &mut errors,
            "publishDate",
            required(raw, "publishDate").and_then(coerce_date),
        );
        let tags = match required(raw, "tags") {
            Ok(value) => match string_list(value) {
                Ok(tags) => Some(tags),
                Err(tag_errors) => {
                    for err in tag_errors {
                        errors.add("tags", err);
                    }
                    None
                }
            },
            Err(err) => {
                errors.add("tags", err);
                None
            }
        };
        let img = collect(&mut errors, "img", required(raw, "img").and_then(expect_string));
        let img_alt = collect(&mut errors, "img_alt", optional(raw, "img_alt", expect_string));
        let category = collect(
            &mut errors,
            "category",
            required(raw, "category").and_then(parse_category),
        );
        let status = collect(&mut errors, "status", optional(raw, "status", parse_status));
        let project_url = collect(&mut errors, "project_url", optional(raw, "project_url", expect_url));
        let github_url = collect(&mut errors, "github_url", optional(raw, "github_url", expect_url));
        let demo_url = collect(&mut errors, "demo_url", optional(raw, "demo_url", expect_url));

        match (title, description, publish_date, tags, img, img_alt, category, status, project_url, github_url, demo_url) {
            (
                Some(title),
                Some(description),
                Some(publish_date),
                Some(tags),
                Some(img),
                Some(img_alt),
                Some(category),
                Some(status),
                Some(project_url),
                Some(github_url),
                Some(demo_url),
            ) if errors.errors().is_empty() => Ok(WorkItem {
                title,
                description,
                publish_date,
                tags,
                img,
                img_alt,
                category,
                status: status.unwrap_or_default(),
                project_url,
                github_url,
                demo_url,
            }),
            _ => Err(errors),
        }
    }
}

// ───── Field Helpers ─────────────────────────────────────────────────

fn collect<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<T, ValidationError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.add(field, err);
            None
        }
    }
}

/// Looks up a field, treating `null` the same as an absent key.
fn present<'a>(raw: &'a RawRecord, field: &str) -> Option<&'a Value> {
    raw.get(field).filter(|v| !v.is_null())
}

fn required<'a>(raw: &'a RawRecord, field: &str) -> Result<&'a Value, ValidationError> {
    present(raw, field).ok_or_else(|| new_validation_error("required", "Required".into()))
}

fn optional<T>(
    raw: &RawRecord,
    field: &str,
    parse: impl Fn(&Value) -> Result<T, ValidationError>,
) -> Result<Option<T>, ValidationError> {
    present(raw, field).map(parse).transpose()
}

fn expect_string(value: &Value) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid_type("string", value))
}

fn string_list(value: &Value) -> Result<Vec<String>, Vec<ValidationError>> {
    let items = value.as_array().ok_or_else(|| vec![invalid_type("array", value)])?;

    let mut tags = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(tag) => tags.push(tag.to_string()),
            None => {
                let mut err = new_validation_error(
                    "invalid_type",
                    format!("Expected string at index {}, received {}", index, value_kind(item)).into(),
                );
                err.add_param(Cow::Borrowed("expected"), &"string");
                err.add_param(Cow::Borrowed("index"), &index);
                err.add_param(Cow::Borrowed("value"), item);
                errors.push(err);
            }
        }
    }

    if errors.is_empty() { Ok(tags) } else { Err(errors) }
}

fn parse_category(value: &Value) -> Result<Category, ValidationError> {
    let raw = expect_string(value)?;
    raw.parse::<Category>()
        .map_err(|_| invalid_enum_value(&Category::VARIANTS, value))
}

fn parse_status(value: &Value) -> Result<Status, ValidationError> {
    let raw = expect_string(value)?;
    raw.parse::<Status>()
        .map_err(|_| invalid_enum_value(&Status::VARIANTS, value))
}

fn expect_url(value: &Value) -> Result<String, ValidationError> {
    let url = expect_string(value)?;
    validate_url(&url).map_err(|mut err| {
        err.add_param(Cow::Borrowed("value"), value);
        err
    })?;
    Ok(url)
}

/// Coerces a date-like value into a UTC timestamp.
///
/// Strings may be RFC 3339, RFC 2822, a calendar date (`YYYY-MM-DD`,
/// `YYYY-MM` or `YYYY`, midnight UTC) or an ISO date-time with or without
/// seconds. Zone-less date-times are read as UTC. Numbers are epoch
/// milliseconds.
pub fn coerce_date(value: &Value) -> Result<DateTime<Utc>, ValidationError> {
    let parsed = match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        other => return Err(invalid_type("date", other)),
    };

    parsed.ok_or_else(|| {
        let mut err = new_validation_error("invalid_date", "Invalid date".into());
        err.add_param(Cow::Borrowed("expected"), &"date");
        err.add_param(Cow::Borrowed("value"), value);
        err
    })
}

fn parse_date_str(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(date) = parse_calendar_date(input) {
        return Some(date.and_time(NaiveTime::MIN).and_utc());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    // A trailing `Z` on a reduced-precision time is plain UTC.
    let zone_less = input.strip_suffix(['Z', 'z']).unwrap_or(input);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(zone_less, format) {
            return Some(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc2822(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`; missing parts default to the first.
fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split('-').collect();
    let widths_ok = parts.iter().enumerate().all(|(i, part)| {
        let width_ok = if i == 0 { part.len() == 4 } else { (1..=2).contains(&part.len()) };
        width_ok && part.bytes().all(|b| b.is_ascii_digit())
    });
    if !widths_ok || parts.len() > 3 {
        return None;
    }

    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts.get(1).map_or(Ok(1), |m| m.parse()).ok()?;
    let day: u32 = parts.get(2).map_or(Ok(1), |d| d.parse()).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Accepts absolute URLs that carry a host (`https://example.com/x`).
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.has_host() => Ok(()),
        Ok(_) => Err(new_validation_error("invalid_url", "URL must include a host".into())),
        Err(_) => Err(new_validation_error("invalid_url", "Invalid url".into())),
    }
}

// ───── Error Constructors ────────────────────────────────────────────

fn new_validation_error(code: &'static str, msg: Cow<'static, str>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(msg);
    err
}

fn invalid_type(expected: &'static str, value: &Value) -> ValidationError {
    let mut err = new_validation_error(
        "invalid_type",
        format!("Expected {}, received {}", expected, value_kind(value)).into(),
    );
    err.add_param(Cow::Borrowed("expected"), &expected);
    err.add_param(Cow::Borrowed("value"), value);
    err
}

fn invalid_enum_value(variants: &[&str], value: &Value) -> ValidationError {
    let expected = variants.iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(" | ");
    let received = value.as_str().unwrap_or_default();

    let mut err = new_validation_error(
        "invalid_enum_value",
        format!("Invalid enum value. Expected {}, received '{}'", expected, received).into(),
    );
    err.add_param(Cow::Borrowed("expected"), &expected);
    err.add_param(Cow::Borrowed("value"), value);
    err
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
