// Static scan of every source file for tracing calls that would put patient
// text into logs. Logs carry ids, counts, acuity and model names only.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    /// Field names and interpolations that MUST NOT appear in tracing macro
    /// arguments.
    const PHI_PATTERNS: &[&str] = &[
        "raw_input",
        "chief_complaint",
        "symptoms",
        "medical_history",
        "medications",
        "allergies",
        "transcript",
        "escalation_reason",
        "red_flag_names",
        "explanation",
        "reply.text",
        "completion.text",
        "text = %",
        "text = ?",
        "payload = ",
        "summary = ",
    ];

    const TRACING_MACROS: &[&str] = &[
        "tracing::info!",
        "tracing::warn!",
        "tracing::error!",
        "tracing::debug!",
        "tracing::trace!",
    ];

    const ALLOWLIST: &[&str] = &["phi_audit.rs"];

    #[test]
    fn no_phi_in_tracing_calls() {
        let src_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        assert!(src_dir.exists(), "Source directory not found: {}", src_dir.display());

        let mut violations = Vec::new();
        scan_directory(&src_dir, &src_dir, &mut violations);

        if !violations.is_empty() {
            let report = violations
                .iter()
                .map(|(file, line_num, call, pattern)| {
                    format!("  {file}:{line_num}: found '{pattern}' in: {call}")
                })
                .collect::<Vec<_>>()
                .join("\n");
            panic!(
                "PHI audit failed, {} violation(s) in tracing calls:\n{}\n\n\
                 Log ids and counts instead of patient text.",
                violations.len(),
                report
            );
        }
    }

    #[test]
    fn scanner_detects_known_violation() {
        let source = "fn f() {\n    tracing::info!(\n        complaint = %e.chief_complaint,\n        \"turn\"\n    );\n}";
        let calls = tracing_calls(source);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 2);
        assert!(violating_pattern(&calls[0].1).is_some());
    }

    #[test]
    fn scanner_finds_calls_after_match_arms() {
        let source = r#"Err(_) => tracing::warn!(symptoms = ?s, "bad"),"#;
        let calls = tracing_calls(source);
        assert_eq!(calls.len(), 1);
        assert_eq!(violating_pattern(&calls[0].1), Some("symptoms"));
    }

    #[test]
    fn scanner_passes_clean_tracing() {
        let source = r#"tracing::info!(trace_id = %trace_id, acuity = 2, "Triage assessment complete");"#;
        let calls = tracing_calls(source);
        assert_eq!(calls.len(), 1);
        assert!(violating_pattern(&calls[0].1).is_none());
    }

    fn violating_pattern(call: &str) -> Option<&'static str> {
        PHI_PATTERNS.iter().copied().find(|p| call.contains(p))
    }

    /// Full text of each tracing macro call with its 1-indexed start line.
    fn tracing_calls(content: &str) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let mut calls = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let trimmed = lines[i].trim();
            let start = TRACING_MACROS
                .iter()
                .filter_map(|m| trimmed.find(m))
                .min();
            let Some(start) = start else {
                i += 1;
                continue;
            };

            let mut call = String::from(&trimmed[start..]);
            let mut depth = paren_delta(&call);
            let mut j = i + 1;
            while depth > 0 && j < lines.len() {
                let next = lines[j].trim();
                call.push(' ');
                call.push_str(next);
                depth += paren_delta(next);
                j += 1;
            }
            calls.push((i + 1, call));
            i = j;
        }
        calls
    }

    fn paren_delta(s: &str) -> i32 {
        s.chars().fold(0, |depth, ch| match ch {
            '(' => depth + 1,
            ')' => depth - 1,
            _ => depth,
        })
    }

    fn scan_directory(
        root: &Path,
        dir: &Path,
        violations: &mut Vec<(String, usize, String, &'static str)>,
    ) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                scan_directory(root, &path, violations);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                scan_file(root, &path, violations);
            }
        }
    }

    fn scan_file(
        root: &Path,
        path: &Path,
        violations: &mut Vec<(String, usize, String, &'static str)>,
    ) {
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        if ALLOWLIST.iter().any(|a| filename.contains(a)) {
            return;
        }
        let Ok(content) = fs::read_to_string(path) else {
            return;
        };
        let relative = path.strip_prefix(root).unwrap_or(path).display().to_string();

        for (line, call) in tracing_calls(&content) {
            if let Some(pattern) = violating_pattern(&call) {
                violations.push((relative.clone(), line, call, pattern));
            }
        }
    }
}
