use cortxt::budget::{DEFAULT_SCORE, truncate};
use cortxt::{Budget, Budgeter, PriorityRule, PriorityTable};

/// Text of exactly `len` bytes made of 100-byte lines.
fn text(len: usize) -> String {
    let line = format!("{}\n", "x".repeat(99));
    let mut s = line.repeat(len / 100);
    s.push_str(&"y".repeat(len % 100));
    s
}

fn budget(max_total_kb: usize, truncate_cap: usize, activation_threshold: usize) -> Budget {
    Budget {
        max_total_bytes: max_total_kb * 1024,
        truncate_cap,
        activation_threshold,
    }
}

fn files(spec: &[(&str, usize)]) -> Vec<(String, String)> {
    spec.iter()
        .map(|(path, len)| (path.to_string(), text(*len)))
        .collect()
}

#[test]
fn default_table_scores() {
    let table = PriorityTable::default();
    assert_eq!(table.score("package.json"), 100);
    assert_eq!(table.score("README.md"), 90);
    assert_eq!(table.score("docs/README.md"), 90);
    assert_eq!(table.score("src/index.js"), 80);
    assert_eq!(table.score("server.js"), 75);
    assert_eq!(table.score("src/util.js"), 70);
    assert_eq!(table.score("src/Util.JS"), 70);
    assert_eq!(table.score("src/walker.rs"), 55);
    assert_eq!(table.score("CHANGELOG.md"), 50);
    assert_eq!(table.score("tsconfig.json"), 30);
    assert_eq!(table.score("notes.txt"), DEFAULT_SCORE);
    assert_eq!(table.score("Makefile"), DEFAULT_SCORE);
}

#[test]
fn first_matching_rule_wins() {
    let table = PriorityTable::new(
        vec![
            PriorityRule::extension(".json", 10),
            PriorityRule::exact("package.json", 100),
        ],
        1,
    );
    assert_eq!(table.score("package.json"), 10);
    assert_eq!(table.score("a.txt"), 1);
}

#[test]
fn short_content_is_not_truncated() {
    assert_eq!(truncate("hello\nworld", "a.txt", 5000), None);
    assert_eq!(truncate(&text(5000), "a.txt", 5000), None);
}

#[test]
fn truncation_cuts_at_newline_within_cap() {
    let content = text(20_000);
    let out = truncate(&content, "src/big.js", 5000).unwrap();
    assert!(out.len() <= 5000);
    let (body, note) = out.split_once("\n\n// ... (file truncated").unwrap();
    assert!(content.starts_with(body));
    assert!(content[body.len()..].starts_with('\n'));
    assert!(note.contains("of 20000 bytes"));
    assert!(note.contains("cortxt file src/big.js"));
}

#[test]
fn truncation_without_newline_cuts_at_limit() {
    let content = "z".repeat(10_000);
    let out = truncate(&content, "min.js", 5000).unwrap();
    assert!(out.len() <= 5000);
    assert!(out.starts_with(&"z".repeat(4000)));
}

#[test]
fn truncation_respects_char_boundaries() {
    let content = "é".repeat(6000);
    let out = truncate(&content, "u.txt", 5001).unwrap();
    assert!(out.len() <= 5001);
    assert!(out.starts_with('é'));
}

#[test]
fn cap_smaller_than_note_keeps_body_within_cap() {
    let content = "line one\n".repeat(50);
    let out = truncate(&content, "src/a.rs", 60).unwrap();
    assert!(out.len() <= 60);
    assert!(!out.is_empty());
    assert!(content.starts_with(&out));
    assert!(!out.ends_with('\n'));
}

#[test]
fn small_cap_bounds_every_selected_file() {
    let input = vec![
        ("a.rs".to_string(), "line one\n".repeat(50)),
        ("b.rs".to_string(), "line two\n".repeat(50)),
        ("c.txt".to_string(), "short".to_string()),
    ];
    let small = Budget {
        max_total_bytes: 300,
        truncate_cap: 100,
        activation_threshold: 0,
    };
    let selection = Budgeter::new(PriorityTable::default(), small).apply(input, false);
    assert!(selection.activated);
    assert_eq!(selection.files.len(), 3);
    for file in &selection.files {
        assert!(file.content.len() <= 100, "{} is {} bytes", file.path, file.content.len());
    }
    assert!(selection.total_bytes() <= 300);
}

#[test]
fn below_threshold_returns_input_unchanged() {
    let input = files(&[("b.txt", 100), ("a.rs", 200)]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(1, 50, 500_000));
    let selection = budgeter.apply(input.clone(), false);
    assert!(!selection.activated);
    assert!(!selection.was_reduced());
    let out: Vec<(String, String)> = selection
        .files
        .into_iter()
        .map(|f| (f.path, f.content))
        .collect();
    assert_eq!(out, input);
}

#[test]
fn force_include_all_disables_budgeting() {
    let input = files(&[("a.txt", 400_000), ("b.txt", 400_000)]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(1, 5000, 500_000));
    let selection = budgeter.apply(input, true);
    assert!(!selection.activated);
    assert_eq!(selection.files.len(), 2);
    assert_eq!(selection.total_bytes(), 800_000);
}

#[test]
fn large_project_scenario_keeps_all_four_files() {
    let input = files(&[
        ("package.json", 50),
        ("README.md", 20_000),
        ("src/index.js", 300_000),
        ("notes.txt", 200_000),
    ]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(400, 5000, 500_000));
    let selection = budgeter.apply(input, false);

    assert!(selection.activated);
    assert_eq!(selection.raw_bytes, 520_050);
    let paths: Vec<&str> = selection.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["package.json", "README.md", "src/index.js", "notes.txt"]);

    let index = &selection.files[2];
    let notes = &selection.files[3];
    assert!(index.truncated && notes.truncated);
    assert!(index.content.contains("file truncated"));
    assert!(!selection.files[0].truncated);
    assert!(selection.total_bytes() <= 50 + 3 * 5000);
    assert!(selection.was_reduced());
}

#[test]
fn selection_stops_at_first_overflow() {
    let input = files(&[("notes.txt", 50), ("a.rs", 900), ("b.json", 200)]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(1, 5000, 0));
    let selection = budgeter.apply(input, false);
    let paths: Vec<&str> = selection.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.rs"]);
}

#[test]
fn oversized_first_file_is_kept_alone() {
    let input = files(&[("main.rs", 3000), ("b.txt", 10)]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(1, 5000, 0));
    let selection = budgeter.apply(input, false);
    assert_eq!(selection.files.len(), 1);
    assert_eq!(selection.files[0].path, "main.rs");
    assert_eq!(selection.total_bytes(), 3000);
}

#[test]
fn selection_is_budgeted_prefix_of_ranking() {
    let spec: Vec<(String, usize)> = (0..40)
        .map(|i| {
            let ext = ["rs", "md", "json", "txt"][i % 4];
            (format!("f{i:02}.{ext}"), 300 + (i * 37) % 900)
        })
        .collect();
    let input: Vec<(String, String)> = spec.iter().map(|(p, n)| (p.clone(), text(*n))).collect();
    let table = PriorityTable::default();
    let budgeter = Budgeter::new(table.clone(), budget(8, 5000, 0));
    let selection = budgeter.apply(input.clone(), false);

    assert!(selection.total_bytes() <= 8 * 1024);

    let mut ranked: Vec<&str> = input.iter().map(|(p, _)| p.as_str()).collect();
    ranked.sort_by_key(|p| std::cmp::Reverse(table.score(p)));
    let selected: Vec<&str> = selection.files.iter().map(|f| f.path.as_str()).collect();
    assert!(!selected.is_empty());
    assert_eq!(selected.as_slice(), &ranked[..selected.len()]);
}

#[test]
fn equal_scores_keep_traversal_order() {
    let input = files(&[("c.txt", 10), ("a.txt", 10), ("b.txt", 10)]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(1, 5000, 0));
    let selection = budgeter.apply(input, false);
    let paths: Vec<&str> = selection.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["c.txt", "a.txt", "b.txt"]);
}

#[test]
fn identical_input_gives_identical_selection() {
    let input = files(&[("a.rs", 9000), ("b.md", 7000), ("c.txt", 3000), ("package.json", 400)]);
    let budgeter = Budgeter::new(PriorityTable::default(), budget(10, 5000, 0));
    let first = budgeter.apply(input.clone(), false);
    let second = budgeter.apply(input, false);
    assert_eq!(first.files, second.files);
}
