use cortxt::ignore_rules::{
    AddOutcome, DEFAULT_PATTERNS, IGNORE_FILE_NAME, RemoveOutcome, RuleSource, add_pattern,
    parse_patterns, read_ignore_file, remove_pattern, reset_ignore_file,
};
use cortxt::{IgnoreMatcher, IgnoreRule, IgnoreRules};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn ignored(matcher: &IgnoreMatcher, relative: &str) -> bool {
    let path = matcher.root().join(relative);
    let name = relative.rsplit('/').next().unwrap();
    matcher.is_ignored(&path, name)
}

fn custom(patterns: &[&str]) -> IgnoreMatcher {
    IgnoreMatcher::new("/proj", IgnoreRules::custom(patterns.iter(), "/proj/.cortxtignore"))
}

#[test]
fn literal_node_modules_excludes_any_path_containing_it() {
    let matcher = IgnoreMatcher::new("/proj", IgnoreRules::defaults());
    assert!(ignored(&matcher, "node_modules"));
    assert!(ignored(&matcher, "packages/web/node_modules/react/index.js"));
    assert!(!ignored(&matcher, "src/index.js"));
}

#[test]
fn star_glob_matches_suffix_only() {
    let matcher = custom(&["*.log"]);
    assert!(ignored(&matcher, "app.log"));
    assert!(ignored(&matcher, "a.b.log"));
    assert!(ignored(&matcher, "logs/nested/server.log"));
    assert!(!ignored(&matcher, "log.txt"));
    assert!(!ignored(&matcher, "app.log.bak"));
}

#[test]
fn question_mark_matches_one_character() {
    let matcher = custom(&["v?.txt"]);
    assert!(ignored(&matcher, "v1.txt"));
    assert!(!ignored(&matcher, "v10.txt"));
}

#[test]
fn glob_matches_relative_path() {
    let matcher = custom(&["docs/*.md"]);
    assert!(ignored(&matcher, "docs/guide.md"));
    assert!(!ignored(&matcher, "guide.md"));
}

#[test]
fn glob_metacharacters_other_than_wildcards_are_literal() {
    let matcher = custom(&["[draft]*"]);
    assert!(ignored(&matcher, "[draft]notes.md"));
    assert!(!ignored(&matcher, "dnotes.md"));

    let matcher = custom(&["{a,b}*"]);
    assert!(ignored(&matcher, "{a,b}.rs"));
    assert!(!ignored(&matcher, "a.rs"));
}

#[test]
fn literal_pattern_matches_name_or_substring() {
    let matcher = custom(&["secret"]);
    assert!(ignored(&matcher, "secret"));
    assert!(ignored(&matcher, "config/secret.json"));
    assert!(!ignored(&matcher, "config/public.json"));
}

#[test]
fn custom_rules_replace_defaults() {
    let matcher = custom(&["*.md"]);
    assert!(ignored(&matcher, "README.md"));
    assert!(!ignored(&matcher, "app.log"));
    assert!(!ignored(&matcher, "coverage/lcov.info"));
}

#[test]
fn safety_net_survives_custom_rules() {
    let matcher = custom(&["*.md"]);
    assert!(ignored(&matcher, "node_modules"));
    assert!(ignored(&matcher, ".git/HEAD"));
    assert!(ignored(&matcher, "dist/bundle.js"));
    assert!(ignored(&matcher, "sub/build/out.o"));
    assert!(ignored(&matcher, "package-lock.json"));
    assert!(ignored(&matcher, "web/yarn.lock"));
    assert!(!ignored(&matcher, "src/distance.rs"));
}

#[test]
fn rule_kind_follows_wildcards() {
    assert!(IgnoreRule::parse("*.log").unwrap().is_glob());
    assert!(IgnoreRule::parse("a?c").unwrap().is_glob());
    assert!(!IgnoreRule::parse("node_modules").unwrap().is_glob());
    assert!(IgnoreRule::parse("   ").is_none());
}

#[test]
fn parse_patterns_drops_comments_and_blanks() {
    let text = "# header\n\n*.log\n  build  \n#tmp\n";
    assert_eq!(parse_patterns(text), vec!["*.log", "build"]);
}

#[test]
fn missing_rule_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let rules = IgnoreRules::load(&dir.path().join(IGNORE_FILE_NAME));
    assert!(rules.is_default());
    assert_eq!(rules.patterns().count(), DEFAULT_PATTERNS.len());
}

#[test]
fn empty_rule_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(IGNORE_FILE_NAME);
    fs::write(&path, "# nothing here\n\n").unwrap();
    assert!(IgnoreRules::load(&path).is_default());
}

#[test]
fn undecodable_rule_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(IGNORE_FILE_NAME);
    fs::write(&path, [0xffu8, 0xfe, 0x00, 0x2a]).unwrap();
    assert!(IgnoreRules::load(&path).is_default());
}

#[test]
fn rule_file_patterns_load_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(IGNORE_FILE_NAME);
    fs::write(&path, "*.md\n# c\nvendor\n").unwrap();
    let rules = IgnoreRules::load(&path);
    assert_eq!(rules.source(), &RuleSource::Custom(path.clone()));
    assert_eq!(rules.patterns().collect::<Vec<_>>(), vec!["*.md", "vendor"]);
}

#[test]
fn add_seeds_defaults_and_rejects_duplicates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(IGNORE_FILE_NAME);

    assert_eq!(add_pattern(&path, "*.bak").unwrap(), AddOutcome::Added);
    let stored = read_ignore_file(&path).unwrap().unwrap();
    assert_eq!(stored.len(), DEFAULT_PATTERNS.len() + 1);
    assert_eq!(stored.last().map(String::as_str), Some("*.bak"));
    assert!(fs::read_to_string(&path).unwrap().starts_with('#'));

    assert_eq!(add_pattern(&path, "*.bak").unwrap(), AddOutcome::AlreadyPresent);
}

#[test]
fn remove_reports_each_outcome() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(IGNORE_FILE_NAME);
    assert_eq!(remove_pattern(&path, "*.log").unwrap(), RemoveOutcome::NoIgnoreFile);

    fs::write(&path, "*.log\nvendor\n").unwrap();
    assert_eq!(remove_pattern(&path, "*.tmp").unwrap(), RemoveOutcome::PatternNotFound);
    assert_eq!(remove_pattern(&path, "*.log").unwrap(), RemoveOutcome::Removed);
    assert_eq!(read_ignore_file(&path).unwrap().unwrap(), vec!["vendor"]);
}

#[test]
fn reset_restores_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(IGNORE_FILE_NAME);
    fs::write(&path, "only-this\n").unwrap();
    reset_ignore_file(&path).unwrap();
    let stored = read_ignore_file(&path).unwrap().unwrap();
    assert_eq!(stored, DEFAULT_PATTERNS.to_vec());
    assert!(read_ignore_file(Path::new("/nonexistent/.cortxtignore")).unwrap().is_none());
}
