use assert_fs::prelude::*;
use predicates::prelude::*;

fn golden_diff() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("golden-diff");
    cmd.env_remove("GOLDEN_UPDATE");
    cmd
}

#[test]
fn test_text_equal_exits_zero() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("expected.txt").write_str("foo\nbar").unwrap();
    temp.child("actual.txt").write_str("foo\nbar\n").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["text", "expected.txt", "actual.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_text_different_prints_diff() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("expected.txt").write_str("foo\nbar\n").unwrap();
    temp.child("actual.txt").write_str("foo\nbaz\n").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["text", "expected.txt", "actual.txt"])
        .assert()
        .code(1)
        .stdout("--- expected\n+++ actual\n@@ -1,2 +1,2 @@\n foo\n-bar\n+baz\n");

    temp.child("expected.txt").assert("foo\nbar\n");
}

#[test]
fn test_text_update_rewrites_expected() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("expected.txt").write_str("old\n").unwrap();
    temp.child("actual.txt").write_str("new\n").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["text", "expected.txt", "actual.txt", "--update"])
        .assert()
        .code(1);
    temp.child("expected.txt").assert("new\n");

    golden_diff()
        .current_dir(temp.path())
        .args(["text", "expected.txt", "actual.txt"])
        .assert()
        .success();
}

#[test]
fn test_json_ignores_formatting() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("expected.json").write_str("{\"a\": 1, \"b\": 2}").unwrap();
    temp.child("actual.json").write_str("{\n  \"b\": 2,\n  \"a\": 1\n}\n").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["json", "expected.json", "actual.json"])
        .assert()
        .success();
}

#[test]
fn test_json_update_creates_missing_fixture() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("actual.json").write_str("{\"a\": 1}\n").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["json", "expected.json", "actual.json", "--update"])
        .assert()
        .code(1);
    temp.child("expected.json").assert("{\"a\": 1}\n");

    golden_diff()
        .current_dir(temp.path())
        .args(["json", "expected.json", "actual.json"])
        .assert()
        .success();
}

#[test]
fn test_http_response_update_creates_missing_fixture() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("actual.http")
        .write_str("HTTP/1.1 204 No Content\r\n\r\n")
        .unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["http-response", "expected.http", "actual.http", "--update"])
        .assert()
        .code(1);
    temp.child("expected.http").assert("HTTP/1.1 204 No Content\r\n\r\n");
}

#[test]
fn test_json_number_forms_are_equal() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("expected.json").write_str("{\"a\": 1}").unwrap();
    temp.child("actual.json").write_str("{\"a\": 1.0}").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["json", "expected.json", "actual.json"])
        .assert()
        .success();
}

#[test]
fn test_missing_actual_exits_two() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("expected.txt").write_str("x").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["text", "expected.txt", "nope.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read actual input"));
}

#[test]
fn test_missing_input_exits_two() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("actual.txt").write_str("x").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["json", "nope.json", "actual.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read expected input"));
}

#[test]
fn test_hash_then_dir_round_trip() {
    let temp = assert_fs::TempDir::new().unwrap();
    let tree = temp.child("tree");
    tree.child("foo").write_str("foo").unwrap();
    tree.child("bar/baz").write_str("baz").unwrap();

    let output = golden_diff()
        .current_dir(temp.path())
        .args(["hash", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"foo\": \"acbd18db4cc2f85cedef654fccc4a4d8\""))
        .stdout(predicate::str::contains("\"bar/\": \"<dir>\""))
        .get_output()
        .stdout
        .clone();
    temp.child("tree.json").write_binary(&output).unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["dir", "tree", "tree.json"])
        .assert()
        .success();

    tree.child("extra").write_str("new file").unwrap();
    golden_diff()
        .current_dir(temp.path())
        .args(["dir", "tree", "tree.json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("+    \"extra\""));
}

#[test]
fn test_sha256_from_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("golden-diff.toml")
        .write_str("[hashing]\nalgorithm = \"sha256\"\n")
        .unwrap();
    temp.child("tree/foo").write_str("foo").unwrap();

    golden_diff()
        .current_dir(temp.path())
        .args(["hash", "tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae",
        ));
}
