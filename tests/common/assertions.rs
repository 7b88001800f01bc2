//! Custom assertion utilities for tests.

/// Assert that `text` contains a rendered report with `errors` violations,
/// in the fixed header/entry/footer order.
pub fn assert_report_layout(text: &str, context_line: &str, errors: usize) {
    let rule = "=".repeat(70);
    let expected_order = [
        rule.as_str(),
        "TYPE VALIDATION ERROR - MULTIPLE ERRORS FOUND",
        "File: ",
        "Line: ",
        context_line,
    ];
    let mut cursor = 0;
    for needle in expected_order {
        match text[cursor..].find(needle) {
            Some(offset) => cursor += offset + needle.len(),
            None => panic!("report is missing '{}' after byte {}:\n{}", needle, cursor, text),
        }
    }

    let total = format!("Total errors: {}", errors);
    assert!(text.contains(&total), "expected '{}' in:\n{}", total, text);
    for i in 1..=errors {
        let header = format!("--- ERROR {} ---", i);
        assert!(text.contains(&header), "expected '{}' in:\n{}", header, text);
    }
    let extra = format!("--- ERROR {} ---", errors + 1);
    assert!(!text.contains(&extra), "unexpected '{}' in:\n{}", extra, text);
}

/// Parse JSON Lines output, panicking on any malformed line.
pub fn parse_json_lines(output: &str) -> Vec<serde_json::Value> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("invalid JSON line {:?}: {}", line, e))
        })
        .collect()
}
