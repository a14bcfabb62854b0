//! Validation Integration Tests
//!
//! The validator is exercised the way the import tooling uses it: against
//! whole artifact files, including hand-authored ones the typed decoder
//! would refuse to load.

use lobster_ingest::cli::run_validate;
use lobster_ingest::validate;
use serde_json::{json, Value};

fn full_artifact() -> Value {
    json!({
        "Resource": [
            {
                "ResourceID": 10,
                "Date": "2025-03-04",
                "DateFor": "2025-03-04",
                "Author": "lobster notes web scraper",
                "Topic": "Intro to Limits",
                "Keywords": null,
                "Rating": 9.9,
                "Format": "Website",
                "isVerified": false
            },
            {
                "ResourceID": 11,
                "Date": "2025-03-04",
                "DateFor": "2025-03-04",
                "Author": "lobster notes web scraper",
                "Topic": "figure 1",
                "Keywords": null,
                "Rating": 9.9,
                "Format": "Image",
                "isVerified": false
            }
        ],
        "Note": [ { "ResourceID": 10, "Body": "Calculus basics" } ],
        "pdf": [],
        "Image": [
            {
                "ResourceID": 11,
                "Link": "https://example.org/fig.png",
                "Width": 10,
                "Height": 20,
                "Size": 200
            }
        ],
        "Video": [],
        "Website": [ { "ResourceID": 10, "Link": "https://example.org/calc" } ]
    })
}

#[test]
fn test_clean_artifact_passes_with_no_issues() {
    let report = validate(&full_artifact());
    assert!(report.is_ok());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_three_independent_violations_yield_exactly_three_errors() {
    let mut artifact = full_artifact();
    // out-of-range rating
    artifact["Resource"][0]["Rating"] = json!(10.5);
    // non-positive duration
    artifact["Video"] = json!([{ "ResourceID": 11, "Duration": 0, "Link": null }]);
    // dangling image reference
    artifact["Image"][0]["ResourceID"] = json!(999);

    let report = validate(&artifact);
    assert_eq!(report.errors.len(), 3, "errors: {:?}", report.errors);

    let locators: Vec<&str> = report.errors.iter().map(|i| i.locator.as_str()).collect();
    assert!(locators.contains(&"Resource[0]"));
    assert!(locators.contains(&"Video[0]"));
    assert!(locators.contains(&"Image[0]"));
}

#[test]
fn test_warnings_do_not_fail_validation() {
    let mut artifact = full_artifact();
    // drop the Size key: warning territory, not an error
    artifact["Image"][0].as_object_mut().unwrap().remove("Size");
    artifact.as_object_mut().unwrap().remove("pdf");

    let report = validate(&artifact);
    assert!(report.is_ok());
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn test_hand_authored_artifact_with_wrong_types_is_fully_reported() {
    let artifact = json!({
        "Resource": [
            "not even an object",
            {
                "ResourceID": true,
                "Date": 20250304,
                "DateFor": "2025-03-04",
                "Author": "a",
                "Topic": "t",
                "Format": "Website"
            }
        ],
        "Note": [ { "ResourceID": 1, "Body": 12 } ],
        "pdf": 7,
        "Image": [],
        "Video": [],
        "Website": []
    });

    let report = validate(&artifact);

    // every malformed row is reported, none aborts the pass
    let locators: Vec<&str> = report.errors.iter().map(|i| i.locator.as_str()).collect();
    assert!(locators.contains(&"Resource[0]"));
    assert!(locators.contains(&"Resource[1]"));
    assert!(locators.contains(&"Note[0]"));
    assert!(locators.contains(&"pdf"));
}

#[test]
fn test_artifact_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifact.json");
    std::fs::write(&path, serde_json::to_string_pretty(&full_artifact()).unwrap()).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    assert!(validate(&value).is_ok());
}

#[test]
fn test_unparseable_file_is_distinguishable_from_invalid_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(serde_json::from_str::<Value>(&content).is_err());
}

#[test]
fn test_exit_codes_for_clean_erroring_and_unreadable_artifacts() {
    let dir = tempfile::tempdir().unwrap();

    let clean = dir.path().join("clean.json");
    std::fs::write(&clean, serde_json::to_string(&full_artifact()).unwrap()).unwrap();
    assert_eq!(run_validate(&clean), 0);

    let mut erroring_artifact = full_artifact();
    erroring_artifact["Resource"][0]["Rating"] = json!(10.5);
    let erroring = dir.path().join("erroring.json");
    std::fs::write(&erroring, serde_json::to_string(&erroring_artifact).unwrap()).unwrap();
    assert_eq!(run_validate(&erroring), 1);

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert_eq!(run_validate(&broken), 2);

    assert_eq!(run_validate(&dir.path().join("missing.json")), 2);
}
