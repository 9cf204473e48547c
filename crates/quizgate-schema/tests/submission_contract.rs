//! Submission payloads as they arrive from clients.

use quizgate_core::ErrorKind;
use quizgate_schema::{Gender, SubmissionValidator};
use serde_json::json;

#[test]
fn test_well_formed_submission_is_returned_unchanged() {
    let payload = json!({ "answers": [{ "id": "q1", "answer": 3 }], "gender": "Female" });
    let submission = SubmissionValidator::shared()
        .unwrap()
        .validate(&payload)
        .unwrap();
    assert_eq!(submission.gender, Gender::Female);
    assert_eq!(submission.answers[0].id, "q1");
    assert_eq!(serde_json::to_value(&submission).unwrap(), payload);
}

#[test]
fn test_string_answer_is_a_structure_error() {
    let errors = SubmissionValidator::shared()
        .unwrap()
        .validate(&json!({ "answers": [{ "id": "q1", "answer": "3" }], "gender": "Female" }))
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.paths(), vec!["[answers][0][answer]"]);
    assert_eq!(errors.errors()[0].kind, ErrorKind::Structure);
}

#[test]
fn test_unknown_gender_is_an_enumeration_error() {
    let errors = SubmissionValidator::shared()
        .unwrap()
        .validate(&json!({ "answers": [{ "id": "q1", "answer": 3 }], "gender": "X" }))
        .unwrap_err();
    assert_eq!(errors.errors()[0].kind, ErrorKind::Enumeration);
    assert_eq!(errors.paths(), vec!["[gender]"]);
}

#[test]
fn test_shared_validator_is_usable_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let payload = json!({ "answers": [{ "id": format!("q{i}"), "answer": i }], "gender": "Other" });
                SubmissionValidator::shared()
                    .unwrap()
                    .validate(&payload)
                    .map(|s| s.answers.len())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 1);
    }
}
