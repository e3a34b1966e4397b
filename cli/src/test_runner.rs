use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use dedlee::options::CompileOptions;
use dedlee::parser::ParseError;

pub const FIXTURE_SUFFIX: &str = ".test.dl";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Human-readable fixture description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected exact markup (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Substrings the markup must contain.
    #[serde(default)]
    pub expect_contains: Vec<String>,

    /// Expected fatal error: the message must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// Expected warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,

    /// Compile options for this fixture.
    #[serde(default)]
    pub options: CompileOptions,
}

/// Split a fixture into its TOML frontmatter and dedlee source.
pub fn parse_fixture(content: &str) -> Result<(FixtureConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let (toml_str, rest) = match after_open.strip_prefix("---") {
        // Empty frontmatter: every expectation at its default.
        Some(rest) => ("", rest),
        None => {
            let close_pos = after_open
                .find("\n---")
                .ok_or("missing closing --- frontmatter delimiter")?;
            (
                after_open[..close_pos].trim_end_matches('\r'),
                &after_open[close_pos + 4..],
            )
        }
    };
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: FixtureConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum Outcome {
    Pass,
    Fail(String),
}

pub struct FixtureResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: Outcome,
}

impl FixtureResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(FIXTURE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

pub fn run_fixture(path: &Path) -> FixtureResult {
    let fail = |description: Option<String>, reason: String| FixtureResult {
        path: path.to_path_buf(),
        description,
        outcome: Outcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_fixture(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();
    log::debug!("running fixture {}", path.display());

    let outcome = match check_fixture(&config, source) {
        None => Outcome::Pass,
        Some(reason) => Outcome::Fail(reason),
    };
    FixtureResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

/// Compile `source` and compare against the expectations. Returns
/// `Some(reason)` on mismatch.
fn check_fixture(config: &FixtureConfig, source: &str) -> Option<String> {
    let result = dedlee::compile_story(source, 0, config.options);

    let story = match (&config.expect_error, result) {
        (Some(expected), Err(errors)) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return if messages.iter().any(|m| m.contains(expected.as_str())) {
                None
            } else {
                Some(format!(
                    "expected error containing \"{}\", got: {}",
                    expected,
                    messages.join("; ")
                ))
            };
        }
        (Some(expected), Ok(_)) => {
            return Some(format!(
                "expected error containing \"{}\", but compilation succeeded",
                expected
            ));
        }
        (None, Err(errors)) => {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return Some(format!("unexpected error: {}", messages.join("; ")));
        }
        (None, Ok(story)) => story,
    };

    let markup = story.to_string();

    if let Some(expected) = &config.expect_output {
        let actual = markup.trim();
        let expected = expected.trim();
        if actual != expected {
            return Some(format!(
                "output mismatch\n  expected:\n{}\n  actual:\n{}",
                indent(expected),
                indent(actual)
            ));
        }
    }

    for needle in &config.expect_contains {
        if !markup.contains(needle.as_str()) {
            return Some(format!(
                "output does not contain \"{}\"\n  actual:\n{}",
                needle,
                indent(markup.trim())
            ));
        }
    }

    config
        .expect_warnings
        .as_ref()
        .and_then(|expected| check_warnings(source, &story.warnings, expected))
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    warnings: &[ParseError],
    expected: &[ExpectedWarning],
) -> Option<String> {
    if warnings.len() != expected.len() {
        let actual: Vec<String> = warnings.iter().map(|w| format!("  - {}", w)).collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual.is_empty() {
                "    (none)".to_string()
            } else {
                actual.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        let message = actual.to_string();
        if !message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, message
            ));
        }
        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, actual.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover fixtures grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_fixtures(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_fixtures(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        log::warn!("cannot read directory {}", dir.display());
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fixtures(&path, root, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(FIXTURE_SUFFIX))
        {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// Keep only the requested categories (and their subcategories).
fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }

    let mut selected = BTreeMap::new();
    for request in requested {
        let request = request.trim_matches('/');
        let prefix = format!("{}/", request);
        let before = selected.len();
        for (category, files) in all {
            if category == request || category.starts_with(&prefix) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                request,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    selected
}

/// List available categories for the given fixture path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} fixtures)", category_label(category), files.len());
    }
}

/// Terminal output for a fixture run.
struct Reporter {
    no_color: bool,
    passed: usize,
    failures: Vec<FixtureResult>,
}

impl Reporter {
    fn new(no_color: bool) -> Self {
        Reporter {
            no_color,
            passed: 0,
            failures: Vec::new(),
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if self.no_color {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        }
    }

    fn header(&self, category: &str) {
        eprintln!();
        eprintln!("{}", self.paint(category_label(category), "1"));
    }

    fn record(&mut self, result: FixtureResult) {
        match result.outcome {
            Outcome::Pass => {
                self.passed += 1;
                eprintln!("  {}  {}", self.paint("PASS", "32"), result.label());
            }
            Outcome::Fail(_) => {
                eprintln!("  {}  {}", self.paint("FAIL", "31"), result.label());
                self.failures.push(result);
            }
        }
    }

    /// Print failure details and the summary line. Returns the exit code.
    fn finish(self) -> i32 {
        if !self.failures.is_empty() {
            eprintln!();
            eprintln!("failures:");
            for failure in &self.failures {
                eprintln!();
                eprintln!("  --- {} ---", failure.path.display());
                if let Outcome::Fail(reason) = &failure.outcome {
                    for line in reason.lines() {
                        eprintln!("  {}", line);
                    }
                }
            }
        }

        eprintln!();
        let failed = self.failures.len();
        if failed == 0 {
            eprintln!(
                "test result: {}. {} passed, 0 failed",
                self.paint("ok", "32"),
                self.passed
            );
            0
        } else {
            eprintln!(
                "test result: {}. {} passed, {} failed (of {})",
                self.paint("FAILED", "31"),
                self.passed,
                failed,
                self.passed + failed
            );
            1
        }
    }
}

/// Run every fixture under `path` (or a single file).
/// If `categories` is non-empty, only run fixtures in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let mut reporter = Reporter::new(no_color);

    if path.is_file() {
        reporter.record(run_fixture(path));
        return reporter.finish();
    }

    let all = discover_categorized(path);
    if all.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let selected = select_categories(&all, categories);
    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    for (category, files) in selected {
        reporter.header(category);
        for file in files {
            reporter.record(run_fixture(file));
        }
    }
    reporter.finish()
}
