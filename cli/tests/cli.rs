use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn dedlee(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dedlee"))
        .args(args)
        .arg("--no-color")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dedlee")
}

fn stories() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/stories")
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write file");
    path
}

#[test]
fn fixture_suite_passes() {
    let output = dedlee(&["test", stories().to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("test result: ok."), "{stderr}");
}

#[test]
fn single_category() {
    let output = dedlee(&["test", stories().to_str().unwrap(), "-c", "links"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("test result: ok. 3 passed"), "{stderr}");
}

#[test]
fn failing_fixture_sets_exit_code() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let fixture = write(
        dir.path(),
        "wrong.test.dl",
        "---\nexpect_output = \"<title>Nope</title>\"\n---\nTitle\n",
    );
    let output = dedlee(&["test", fixture.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("output mismatch"), "{stderr}");
}

#[test]
fn compile_prints_markup() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let story = write(
        dir.path(),
        "story.dl",
        "Links\np.a\n    [[b]]Go to B[[]]\np.b\n    The end\n",
    );
    let output = dedlee(&["compile", story.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<title>Links</title>\n\
         <page id=\"a\">\n\
         \x20   <turn to=\"b\">Go to B</turn>\n\
         </page>\n\
         <page id=\"b\">\n\
         \x20   The end\n\
         </page>\n"
    );
}

#[test]
fn bare_file_argument_means_compile() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let story = write(dir.path(), "story.dl", "Short\n");
    let output = dedlee(&[story.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "<title>Short</title>\n");
}

#[test]
fn sibling_config_and_flag_overrides() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write(dir.path(), "dedlee.toml", "character-close = \"character\"\n");
    let story = write(dir.path(), "story.dl", "T\nc.bob\np.x\n    [[y]]go[[]]\n");

    let output = dedlee(&["compile", story.to_str().unwrap(), "--no-links"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<character id=\"bob\">\n</character>\n"), "{stdout}");
    assert!(stdout.contains("    [[y]]go[[]]\n"), "{stdout}");

    let output = dedlee(&[
        "compile",
        story.to_str().unwrap(),
        "--character-close",
        "obj",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<character id=\"bob\">\n</obj>\n"), "{stdout}");
}

#[test]
fn output_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let story = write(dir.path(), "story.dl", "T\npg.note\n    hi\n");
    let target = dir.path().join("story.html");
    let output = dedlee(&[
        "compile",
        story.to_str().unwrap(),
        "-o",
        target.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "<title>T</title>\n<paragraph id=\"note\">\n    hi\n</paragraph>\n"
    );
}

#[test]
fn outline_lists_elements() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let story = write(
        dir.path(),
        "story.dl",
        "T\np.start (first)\n    o.lamp \"Lamp\"\n        \"Use\"\n",
    );
    let output = dedlee(&["compile", story.to_str().unwrap(), "--outline"]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "page start (first)\n  obj lamp \"Lamp\"\n    action Use\n"
    );
}

#[test]
fn empty_source_reports_diagnostic() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let story = write(dir.path(), "story.dl", "# only a comment\n");
    let output = dedlee(&["compile", story.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("source is empty"), "{stderr}");
}

#[test]
fn check_reports_warnings_and_succeeds() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let story = write(dir.path(), "story.dl", "T\no.lamp \"Brass\n");
    let output = dedlee(&["compile", story.to_str().unwrap(), "--check"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("warning"), "{stderr}");
    assert!(stderr.contains("parsed successfully"), "{stderr}");
    assert!(output.stdout.is_empty());
}
