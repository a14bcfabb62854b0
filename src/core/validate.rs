//! Independent schema validation.
//!
//! A single read-only pass over a raw JSON artifact, checking every record
//! against the import schema's constraints and collecting every violation.
//! The pass is total: malformed input of any shape becomes an issue in the
//! report, never a panic or an early exit. It deliberately operates on
//! `serde_json::Value` rather than the typed records so hand-authored
//! artifacts with wrong types are reported field by field.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::canonical::is_http_url;
use crate::domain::{Artifact, AUTHOR_MAX, BODY_MAX, TOPIC_MAX};

/// The six collections an artifact is expected to carry.
pub const COLLECTIONS: [&str; 6] = ["Resource", "Note", "pdf", "Image", "Video", "Website"];

const FORMATS: [&str; 5] = ["Image", "Note", "Pdf", "Video", "Website"];

/// One located constraint violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Collection name plus index, e.g. `Video[3]`
    pub locator: String,

    pub message: String,
}

impl Issue {
    fn new(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.locator, self.message)
    }
}

/// Everything one validation pass found.
#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl Report {
    fn error(&mut self, locator: &str, message: impl Into<String>) {
        self.errors.push(Issue::new(locator, message));
    }

    fn warning(&mut self, locator: &str, message: impl Into<String>) {
        self.warnings.push(Issue::new(locator, message));
    }

    /// True when the artifact is importable (warnings permitted).
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a typed artifact by checking its serialized form.
pub fn validate_records(artifact: &Artifact) -> Report {
    let value = serde_json::to_value(artifact).unwrap_or(Value::Null);
    validate(&value)
}

/// Validate a raw JSON artifact against the import schema.
///
/// Exhaustive and stateless: every rule is applied to every record, nothing
/// is mutated, and no issue stops the pass.
pub fn validate(root: &Value) -> Report {
    let mut report = Report::default();

    let Some(obj) = root.as_object() else {
        report.error("top-level", "artifact is not a JSON object");
        return report;
    };

    let missing: Vec<&str> = COLLECTIONS
        .iter()
        .copied()
        .filter(|k| !obj.contains_key(*k))
        .collect();
    if !missing.is_empty() {
        // tolerated for forward/backward compatibility
        report.warning(
            "top-level",
            format!("missing expected sections: {}", missing.join(", ")),
        );
    }

    let resources = collection(obj, "Resource", &mut report);
    let notes = collection(obj, "Note", &mut report);
    let pdfs = collection(obj, "pdf", &mut report);
    let images = collection(obj, "Image", &mut report);
    let videos = collection(obj, "Video", &mut report);
    let websites = collection(obj, "Website", &mut report);

    let mut resource_ids: HashSet<i64> = HashSet::new();
    for (idx, row) in resources.iter().enumerate() {
        let locator = format!("Resource[{idx}]");
        let Some(row) = row.as_object() else {
            report.error(&locator, "entry is not an object");
            continue;
        };
        check_resource(row, &locator, &mut report);
        if let Some(rid) = row.get("ResourceID").and_then(Value::as_i64) {
            if !resource_ids.insert(rid) {
                report.error(&locator, format!("duplicate ResourceID {rid}"));
            }
        }
    }

    for (idx, row) in notes.iter().enumerate() {
        let locator = format!("Note[{idx}]");
        let Some(row) = row.as_object() else {
            report.error(&locator, "entry is not an object");
            continue;
        };
        check_reference(row, &locator, &resource_ids, &mut report);
        check_body(row, &locator, &mut report);
    }

    for (idx, row) in pdfs.iter().enumerate() {
        let locator = format!("pdf[{idx}]");
        let Some(row) = row.as_object() else {
            report.error(&locator, "entry is not an object");
            continue;
        };
        check_reference(row, &locator, &resource_ids, &mut report);
        check_body(row, &locator, &mut report);
        check_optional_url(row, "Link", &locator, &mut report);
    }

    for (idx, row) in images.iter().enumerate() {
        let locator = format!("Image[{idx}]");
        let Some(row) = row.as_object() else {
            report.error(&locator, "entry is not an object");
            continue;
        };
        check_reference(row, &locator, &resource_ids, &mut report);
        check_image(row, &locator, &mut report);
    }

    for (idx, row) in videos.iter().enumerate() {
        let locator = format!("Video[{idx}]");
        let Some(row) = row.as_object() else {
            report.error(&locator, "entry is not an object");
            continue;
        };
        check_reference(row, &locator, &resource_ids, &mut report);
        check_video(row, &locator, &mut report);
    }

    for (idx, row) in websites.iter().enumerate() {
        let locator = format!("Website[{idx}]");
        let Some(row) = row.as_object() else {
            report.error(&locator, "entry is not an object");
            continue;
        };
        check_reference(row, &locator, &resource_ids, &mut report);
        check_required_url(row, "Link", &locator, &mut report);
    }

    report
}

const NO_ROWS: &[Value] = &[];

fn collection<'a>(obj: &'a Map<String, Value>, name: &str, report: &mut Report) -> &'a [Value] {
    match obj.get(name) {
        None | Some(Value::Null) => NO_ROWS,
        Some(Value::Array(rows)) => rows,
        Some(_) => {
            report.error(name, "section is not an array");
            NO_ROWS
        }
    }
}

fn check_resource(row: &Map<String, Value>, locator: &str, report: &mut Report) {
    match row.get("ResourceID").and_then(Value::as_i64) {
        None => report.error(locator, "ResourceID missing or not an integer"),
        Some(rid) if rid <= 0 => {
            report.error(locator, format!("ResourceID must be positive, got {rid}"))
        }
        Some(_) => {}
    }

    for key in ["Date", "DateFor"] {
        match row.get(key).and_then(Value::as_str) {
            None => report.error(locator, format!("{key} missing or not a string")),
            Some(s) => {
                if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                    report.error(locator, format!("{key} not ISO date (YYYY-MM-DD): {s}"));
                }
            }
        }
    }

    check_required_string(row, "Author", AUTHOR_MAX, locator, report);
    check_required_string(row, "Topic", TOPIC_MAX, locator, report);

    if let Some(kw) = row.get("Keywords").filter(|v| !v.is_null()) {
        match kw.as_str() {
            None => report.error(locator, "Keywords present but not a string"),
            Some(s) if s.chars().count() > TOPIC_MAX => report.error(
                locator,
                format!("Keywords too long ({} > {TOPIC_MAX})", s.chars().count()),
            ),
            Some(_) => {}
        }
    }

    if let Some(rating) = row.get("Rating").filter(|v| !v.is_null()) {
        match numeric(rating) {
            None => report.error(locator, format!("Rating not numeric: {rating}")),
            Some(r) if !(0.0..=9.9).contains(&r) => {
                report.error(locator, format!("Rating out of range 0.0-9.9: {r}"))
            }
            Some(_) => {}
        }
    }

    let format = row.get("Format").and_then(Value::as_str);
    if !format.is_some_and(|f| FORMATS.contains(&f)) {
        report.error(
            locator,
            format!(
                "Format missing or invalid (allowed: {}): {}",
                FORMATS.join(", "),
                row.get("Format").unwrap_or(&Value::Null)
            ),
        );
    }

    if let Some(v) = row.get("isVerified").filter(|v| !v.is_null()) {
        if !v.is_boolean() {
            report.error(locator, "isVerified present but not boolean");
        }
    }
}

fn check_reference(
    row: &Map<String, Value>,
    locator: &str,
    resource_ids: &HashSet<i64>,
    report: &mut Report,
) {
    match row.get("ResourceID").and_then(Value::as_i64) {
        None => report.error(locator, "ResourceID missing or not an integer"),
        Some(rid) => {
            if !resource_ids.contains(&rid) {
                report.error(locator, format!("ResourceID {rid} has no matching Resource"));
            }
        }
    }
}

fn check_body(row: &Map<String, Value>, locator: &str, report: &mut Report) {
    match row.get("Body").and_then(Value::as_str) {
        None => report.error(locator, "Body missing or not a string"),
        Some(s) if s.chars().count() > BODY_MAX => report.error(
            locator,
            format!("Body too long ({} > {BODY_MAX})", s.chars().count()),
        ),
        Some(_) => {}
    }
}

fn check_image(row: &Map<String, Value>, locator: &str, report: &mut Report) {
    // A missing Size is tolerated pre-import (the column has a default-less
    // NOT NULL, so the importer will still want it); a present but
    // non-positive Size can never load.
    match row.get("Size") {
        None | Some(Value::Null) => {
            report.warning(locator, "Size column expected by the DB is missing")
        }
        Some(v) => match v.as_i64() {
            Some(size) if size > 0 => {}
            _ => report.error(locator, format!("Size must be a positive integer, got: {v}")),
        },
    }

    for key in ["Width", "Height"] {
        if let Some(v) = row.get(key).filter(|v| !v.is_null()) {
            match v.as_i64() {
                Some(d) if d > 0 => {}
                _ => report.error(
                    locator,
                    format!("{key} must be a positive integer, got: {v}"),
                ),
            }
        }
    }

    check_optional_url(row, "Link", locator, report);
}

fn check_video(row: &Map<String, Value>, locator: &str, report: &mut Report) {
    // No tolerance here, unlike Image.Size: the schema gives Duration no
    // safe default.
    let duration = row.get("Duration").and_then(Value::as_i64);
    if !duration.is_some_and(|d| d > 0) {
        report.error(
            locator,
            format!(
                "Duration must be a positive integer (>0); got: {}",
                row.get("Duration").unwrap_or(&Value::Null)
            ),
        );
    }

    check_optional_url(row, "Link", locator, report);
}

fn check_optional_url(row: &Map<String, Value>, key: &str, locator: &str, report: &mut Report) {
    if let Some(v) = row.get(key).filter(|v| !v.is_null()) {
        if !v.as_str().is_some_and(is_http_url) {
            report.error(
                locator,
                format!("{key} is present but not a valid http(s) URL: {v}"),
            );
        }
    }
}

fn check_required_url(row: &Map<String, Value>, key: &str, locator: &str, report: &mut Report) {
    let ok = row
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(is_http_url);
    if !ok {
        report.error(
            locator,
            format!(
                "{key} missing or invalid http(s) URL: {}",
                row.get(key).unwrap_or(&Value::Null)
            ),
        );
    }
}

fn check_required_string(
    row: &Map<String, Value>,
    key: &str,
    max: usize,
    locator: &str,
    report: &mut Report,
) {
    match row.get(key).and_then(Value::as_str) {
        None | Some("") => report.error(locator, format!("{key} missing or not a string")),
        Some(s) if s.chars().count() > max => report.error(
            locator,
            format!("{key} too long ({} > {max})", s.chars().count()),
        ),
        Some(_) => {}
    }
}

/// Numeric value of a JSON number or numeric string.
///
/// The importer's column is numeric(2,1) but upstream producers have emitted
/// both `9.9` and `"9.9"`; both are accepted.
fn numeric(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_artifact() -> Value {
        json!({
            "Resource": [], "Note": [], "pdf": [],
            "Image": [], "Video": [], "Website": []
        })
    }

    fn resource(id: i64) -> Value {
        json!({
            "ResourceID": id,
            "Date": "2025-03-04",
            "DateFor": "2025-03-04",
            "Author": "scraper",
            "Topic": "Limits",
            "Keywords": null,
            "Rating": 9.9,
            "Format": "Website",
            "isVerified": false
        })
    }

    #[test]
    fn test_empty_artifact_is_clean() {
        let report = validate(&empty_artifact());
        assert!(report.is_ok());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_sections_warn_only() {
        let report = validate(&json!({ "Resource": [] }));
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("Note"));
        assert!(report.warnings[0].message.contains("Website"));
    }

    #[test]
    fn test_non_object_artifact_is_an_issue_not_a_panic() {
        assert!(!validate(&json!([1, 2, 3])).is_ok());
        assert!(!validate(&json!("nope")).is_ok());
        assert!(!validate(&Value::Null).is_ok());
    }

    #[test]
    fn test_non_array_section_is_an_error() {
        let mut artifact = empty_artifact();
        artifact["Video"] = json!({"not": "an array"});
        let report = validate(&artifact);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].locator, "Video");
    }

    #[test]
    fn test_resource_field_errors() {
        let mut artifact = empty_artifact();
        artifact["Resource"] = json!([{
            "ResourceID": "seven",
            "Date": "03/04/2025",
            "DateFor": "2025-03-04",
            "Author": "",
            "Topic": "a topic that is clearly longer than twenty five characters",
            "Keywords": 7,
            "Rating": 10.0,
            "Format": "Movie",
            "isVerified": "yes"
        }]);

        let report = validate(&artifact);
        let messages: Vec<&str> = report.errors.iter().map(|i| i.message.as_str()).collect();

        assert!(messages.iter().any(|m| m.contains("ResourceID missing")));
        assert!(messages.iter().any(|m| m.contains("Date not ISO date")));
        assert!(messages.iter().any(|m| m.contains("Author missing")));
        assert!(messages.iter().any(|m| m.contains("Topic too long")));
        assert!(messages.iter().any(|m| m.contains("Keywords present but not a string")));
        assert!(messages.iter().any(|m| m.contains("Rating out of range")));
        assert!(messages.iter().any(|m| m.contains("Format missing or invalid")));
        assert!(messages.iter().any(|m| m.contains("isVerified present but not boolean")));
    }

    #[test]
    fn test_rating_accepts_numeric_strings() {
        let mut artifact = empty_artifact();
        let mut row = resource(1);
        row["Rating"] = json!("7.5");
        artifact["Resource"] = json!([row]);

        assert!(validate(&artifact).is_ok());
    }

    #[test]
    fn test_duplicate_resource_id_is_an_error() {
        let mut artifact = empty_artifact();
        artifact["Resource"] = json!([resource(1), resource(1)]);

        let report = validate(&artifact);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("duplicate ResourceID 1"));
        assert_eq!(report.errors[0].locator, "Resource[1]");
    }

    #[test]
    fn test_dangling_reference_is_an_error() {
        let mut artifact = empty_artifact();
        artifact["Resource"] = json!([resource(1)]);
        artifact["Note"] = json!([{ "ResourceID": 2, "Body": "orphan" }]);

        let report = validate(&artifact);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("no matching Resource"));
    }

    #[test]
    fn test_image_size_missing_warns_nonpositive_errors() {
        let mut artifact = empty_artifact();
        artifact["Resource"] = json!([resource(1), resource(2)]);
        artifact["Image"] = json!([
            { "ResourceID": 1, "Link": "https://example.org/a.png" },
            { "ResourceID": 2, "Link": "https://example.org/b.png", "Size": 0 }
        ]);

        let report = validate(&artifact);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].locator, "Image[0]");
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("Size must be a positive integer"));
    }

    #[test]
    fn test_video_duration_has_no_tolerance() {
        let mut artifact = empty_artifact();
        artifact["Resource"] = json!([resource(1), resource(2), resource(3)]);
        artifact["Video"] = json!([
            { "ResourceID": 1, "Link": null },
            { "ResourceID": 2, "Duration": 0, "Link": null },
            { "ResourceID": 3, "Duration": 90, "Link": null }
        ]);

        let report = validate(&artifact);
        assert_eq!(report.errors.len(), 2);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_url_pattern_enforcement() {
        let mut artifact = empty_artifact();
        artifact["Resource"] = json!([resource(1), resource(2)]);
        artifact["Website"] = json!([
            { "ResourceID": 1, "Link": "ftp://example.org" },
            { "ResourceID": 2 }
        ]);

        let report = validate(&artifact);
        assert_eq!(report.errors.len(), 2);
        for issue in &report.errors {
            assert!(issue.message.contains("Link missing or invalid"));
        }
    }

    #[test]
    fn test_validator_is_exhaustive() {
        // three independent violations -> exactly three errors
        let mut artifact = empty_artifact();
        let mut bad_rating = resource(1);
        bad_rating["Rating"] = json!(12.5);
        artifact["Resource"] = json!([bad_rating]);
        artifact["Video"] = json!([{ "ResourceID": 1, "Duration": -5, "Link": null }]);
        artifact["Image"] = json!([{ "ResourceID": 99, "Link": "https://example.org/a.png", "Size": 4 }]);

        let report = validate(&artifact);
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_issue_display_carries_locator() {
        let issue = Issue::new("Video[3]", "Duration must be a positive integer");
        assert_eq!(
            issue.to_string(),
            "Video[3]: Duration must be a positive integer"
        );
    }
}
