use gradejson::{recover, recover_bytes, ExtractError, ExtractOptions, FailureKind, ParseOutcome};

fn keys(objects: &[serde_json::Value]) -> Vec<&str> {
    objects
        .iter()
        .map(|o| o["grade"].as_str().unwrap())
        .collect()
}

#[test]
fn well_formed_objects_all_parse() {
    let text = r#"{"grade": "5", "questions": []},
{"grade": "4", "questions": []},
{"grade": "3", "questions": []}"#;
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.anchors_found, 3);
    assert_eq!(recovery.report.parsed, 3);
    assert_eq!(recovery.report.failed, 0);
    assert_eq!(recovery.report.unmatched, 0);
    assert_eq!(keys(&recovery.objects), ["5", "4", "3"]);
}

#[test]
fn missing_separator_comma_recovers_both_objects() {
    let text = "{\"grade\":\"5\",\"questions\":[]}\n{\"grade\":\"4\",\"questions\":[]}";
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.parsed, 2);
    assert_eq!(keys(&recovery.objects), ["5", "4"]);
    assert!(recovery.repairs.iter().any(|r| r.op == "insert_separator_comma"));
}

#[test]
fn stray_quote_after_numeric_fields_is_repaired() {
    let text = concat!(
        "{\"grade\": \"pre2\", \"questions\": [",
        "{\"question_number\": 1\", \"points\": 10\"}",
        "]}"
    );
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.parsed, 1);
    let question = &recovery.objects[0]["questions"][0];
    assert_eq!(question["question_number"], 1);
    assert_eq!(question["points"], 10);
    let ops: Vec<&str> = recovery.repairs.iter().map(|r| r.op.as_str()).collect();
    assert!(ops.contains(&"strip_field_numeric_quote"));
    assert!(ops.contains(&"strip_numeric_quote"));
}

#[test]
fn unicode_separators_do_not_break_parsing() {
    let text = "{\"grade\": \"2\",\u{2028}\"questions\": [\u{00A0}]}";
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.parsed, 1);
}

#[test]
fn strings_with_braces_and_escapes_stay_intact() {
    let text = concat!(
        "{\"grade\": \"3\", \"questions\": [",
        "{\"prompt\": \"Say \\\"hi\\\" and mind { the } braces\"}",
        "]}"
    );
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.parsed, 1);
    assert_eq!(
        recovery.objects[0]["questions"][0]["prompt"],
        "Say \"hi\" and mind { the } braces"
    );
}

#[test]
fn unmatched_brace_is_isolated_to_its_anchor() {
    let text = "{\"grade\": \"pre1\", \"questions\": [\n{\"grade\": \"3\", \"questions\": []}";
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.anchors_found, 2);
    assert_eq!(recovery.report.parsed, 1);
    assert_eq!(recovery.report.unmatched, 1);
    assert_eq!(keys(&recovery.objects), ["3"]);

    let first = &recovery.report.outcomes[0];
    assert_eq!(first.key(), "pre1");
    assert!(matches!(
        first,
        ParseOutcome::Failed {
            kind: FailureKind::UnmatchedBrace,
            ..
        }
    ));
}

#[test]
fn structural_failure_carries_context_and_spares_others() {
    // The first object is brace-balanced but misses the comma between its
    // two fields; none of the repair passes touch that defect.
    let text = "{\"grade\": \"4\" \"questions\": []},\n{\"grade\": \"5\", \"questions\": []}";
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.anchors_found, 2);
    assert_eq!(recovery.report.parsed, 1);
    assert_eq!(recovery.report.failed, 1);
    assert_eq!(keys(&recovery.objects), ["5"]);

    match &recovery.report.outcomes[0] {
        ParseOutcome::Failed {
            key,
            kind: FailureKind::StructuralParseError { offset, .. },
            context,
        } => {
            assert_eq!(key, "4");
            let context = context.as_ref().unwrap();
            assert!(context.contains("questions"));
            assert!(*offset > 0);
        }
        other => panic!("expected structural failure, got {other:?}"),
    }
}

#[test]
fn successes_are_canonically_ordered() {
    let text = concat!(
        "{\"grade\": \"pre2\", \"questions\": []},",
        "{\"grade\": \"5\", \"questions\": []},",
        "{\"grade\": \"3\", \"questions\": []}"
    );
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(keys(&recovery.objects), ["5", "3", "pre2"]);
    // The report keeps anchor order.
    let report_keys: Vec<&str> = recovery.report.outcomes.iter().map(|o| o.key()).collect();
    assert_eq!(report_keys, ["pre2", "5", "3"]);
}

#[test]
fn no_anchors_is_a_terminal_error() {
    let err = recover("nothing to see here", &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, ExtractError::NoAnchorsFound { .. }));
    assert!(err.to_string().contains("grade"));
}

#[test]
fn bom_is_stripped_by_the_byte_entry_point() {
    let text = "{\"grade\": \"1\", \"questions\": []}";
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(text.as_bytes());
    let from_bytes = recover_bytes(&bytes, &ExtractOptions::default()).unwrap();
    let from_text = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(from_bytes.objects, from_text.objects);
    assert_eq!(from_bytes.report.parsed, 1);
}

#[test]
fn depth_zero_comma_option_preserves_string_contents() {
    let text = "{\"grade\": \"5\", \"note\": \"end} {start\", \"questions\": []}\n{\"grade\": \"4\", \"questions\": []}";
    let opts = ExtractOptions {
        comma_insert_depth_zero_only: true,
        ..ExtractOptions::default()
    };
    let recovery = recover(text, &opts).unwrap();
    assert_eq!(recovery.report.parsed, 2);
    assert_eq!(recovery.objects[0]["note"], "end} {start");
}

#[test]
fn defective_export_end_to_end() {
    // All three defect classes plus a Unicode line separator in one blob.
    let text = concat!(
        "{\"grade\": \"pre2\",\u{2028}\"questions\": [\n",
        "  {\"question_number\": 1\", \"question_type\": \"vocabulary\", ",
        "\"topic\": \"school\", \"prompt\": \"Say \\\"hello\\\"\"}\n",
        "]}\n",
        "{\"grade\": \"5\", \"questions\": [",
        "{\"question_number\": 2, \"question_type\": \"reading\", ",
        "\"topic\": \"travel\", \"points\": 10\"}",
        "]}"
    );
    let recovery = recover(text, &ExtractOptions::default()).unwrap();
    assert_eq!(recovery.report.anchors_found, 2);
    assert_eq!(recovery.report.parsed, 2);
    assert_eq!(keys(&recovery.objects), ["5", "pre2"]);

    let summary = gradejson::stats::summarize(&recovery.objects, "grade", "questions");
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.per_key[0].by_type["reading"], 1);
    assert_eq!(summary.per_key[1].by_type["vocabulary"], 1);
}
