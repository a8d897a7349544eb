use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("snippets.sqlite3")
    }

    fn log_dir(&self) -> PathBuf {
        self.dir.path().join("logs")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("snippets"));
        cmd.env("SNIPPETS_DB", self.db_path())
            .env("SNIPPETS_LOG_DIR", self.log_dir())
            .env("SNIPPETS_LOG_LEVEL", "debug")
            .current_dir(self.dir.path());
        cmd
    }

    fn put(&self, name: &str, snippet: &str) {
        self.cmd().args(["put", name, snippet]).assert().success();
    }
}

#[test]
fn put_then_get_prints_stored_text() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["put", "greeting", "Hello World"])
        .assert()
        .success()
        .stdout("Stored 'Hello World' as 'greeting'\n");

    sandbox
        .cmd()
        .args(["get", "greeting"])
        .assert()
        .success()
        .stdout("Retrieved snippet: 'Hello World'\n");
}

#[test]
fn put_overwrites_existing_keyword() {
    let sandbox = Sandbox::new();
    sandbox.put("k", "old");
    sandbox.put("k", "new");

    sandbox
        .cmd()
        .args(["get", "k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'new'"));
    sandbox
        .cmd()
        .arg("catalog")
        .assert()
        .success()
        .stdout("Available keywords: ['k']\n");
}

#[test]
fn get_missing_keyword_warns_and_exits_non_zero() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["get", "ghost"])
        .assert()
        .code(1)
        .stdout("Keyword: 'ghost' not available\n")
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn catalog_lists_sorted_keywords() {
    let sandbox = Sandbox::new();
    for name in ["b", "a", "c"] {
        sandbox.put(name, "text");
    }

    sandbox
        .cmd()
        .arg("catalog")
        .assert()
        .success()
        .stdout("Available keywords: ['a', 'b', 'c']\n");
}

#[test]
fn search_prints_each_case_insensitive_match() {
    let sandbox = Sandbox::new();
    sandbox.put("x", "Hello World");
    sandbox.put("y", "goodbye");

    sandbox
        .cmd()
        .args(["search", "hello"])
        .assert()
        .success()
        .stdout("Keyword:'x'  Snippet:'Hello World'\n");

    sandbox
        .cmd()
        .args(["search", "O"])
        .assert()
        .success()
        .stdout("Keyword:'x'  Snippet:'Hello World'\nKeyword:'y'  Snippet:'goodbye'\n");
}

#[test]
fn search_treats_percent_literally() {
    let sandbox = Sandbox::new();
    sandbox.put("sale", "50% off");
    sandbox.put("plain", "nothing special");

    sandbox
        .cmd()
        .args(["search", "%"])
        .assert()
        .success()
        .stdout("Keyword:'sale'  Snippet:'50% off'\n");

    sandbox
        .cmd()
        .args(["search", "zzz"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn search_folds_accented_case_and_accepts_long_queries() {
    let sandbox = Sandbox::new();
    let long = "z".repeat(60_000);
    sandbox.put("cafe", "Café au lait");
    sandbox.put("long", &long);

    sandbox
        .cmd()
        .args(["search", "CAFÉ"])
        .assert()
        .success()
        .stdout("Keyword:'cafe'  Snippet:'Café au lait'\n");

    sandbox
        .cmd()
        .args(["search", "--output", "json", long.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"keyword\": \"long\""));
}

#[test]
fn empty_keyword_is_rejected_with_usage_status() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["put", "", "text"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("keyword cannot be empty"));
}

#[test]
fn json_output_is_machine_readable() {
    let sandbox = Sandbox::new();
    sandbox.put("b", "second");
    sandbox.put("a", "first");

    let output = sandbox
        .cmd()
        .args(["catalog", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let keywords: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(keywords, vec!["a", "b"]);

    let output = sandbox
        .cmd()
        .args(["search", "", "--output", "json"])
        .output()
        .unwrap();
    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hits[0]["keyword"], "a");
    assert_eq!(hits[1]["message"], "second");
}

#[test]
fn writes_rolling_log_file_without_snippet_text() {
    let sandbox = Sandbox::new();
    sandbox.put("secret", "do-not-log-this-text");

    let log_text = read_logs(&sandbox.log_dir());
    assert!(log_text.contains("event=snippet_put"));
    assert!(!log_text.contains("do-not-log-this-text"));
}

#[test]
fn newer_schema_version_is_a_storage_failure() {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.db_path().parent().unwrap()).unwrap();
    let conn = rusqlite::Connection::open(sandbox.db_path()).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    sandbox
        .cmd()
        .arg("catalog")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("newer than supported"));
}

fn read_logs(log_dir: &Path) -> String {
    let mut text = String::new();
    for entry in std::fs::read_dir(log_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "log") {
            text.push_str(&std::fs::read_to_string(path).unwrap());
        }
    }
    text
}
