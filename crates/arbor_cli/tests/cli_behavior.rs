//! Integration tests for CLI behavior
//!
//! These tests run the `arbor` binary against small JSON trees and check
//! its output and exit codes.

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Helper to create a command for the arbor CLI
fn arbor_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_arbor"))
}

const SAMPLE: &str = r#"{
  "type": "File",
  "start": 0,
  "end": 10,
  "program": {
    "type": "Program",
    "body": [
      {
        "type": "ExpressionStatement",
        "leadingComments": [{ "type": "CommentLine", "value": " note" }],
        "expression": {
          "type": "CallExpression",
          "callee": { "type": "Identifier", "name": "f", "_cached": true },
          "arguments": [
            {
              "type": "FunctionExpression",
              "params": [],
              "body": {
                "type": "BlockStatement",
                "body": [{ "type": "ExpressionStatement", "expression": { "type": "ThisExpression" } }]
              }
            }
          ]
        }
      }
    ]
  }
}"#;

fn sample_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("tree.json").write_str(SAMPLE).unwrap();
    temp
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        arbor_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        arbor_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod walk_command {
    use super::*;

    #[test]
    fn prints_enter_and_exit_by_depth() {
        let temp = sample_dir();

        arbor_cmd()
            .current_dir(temp.path())
            .args(["walk", "tree.json"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("> File\n  > Program\n    > ExpressionStatement\n"))
            .stdout(predicate::str::contains("        > Identifier f\n        < Identifier f\n"))
            .stdout(predicate::str::ends_with("  < Program\n< File\n"));
    }

    #[test]
    fn honors_config_blacklist() {
        let temp = sample_dir();
        temp.child(".arbor.jsonc")
            .write_str("{\n  // hide function bodies\n  \"blacklist\": [\"FunctionExpression\"],\n}")
            .unwrap();

        arbor_cmd()
            .current_dir(temp.path())
            .args(["walk", "tree.json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Identifier f"))
            .stdout(predicate::str::contains("FunctionExpression").not())
            .stdout(predicate::str::contains("ThisExpression").not());
    }

    #[test]
    fn fails_on_non_program_root_without_no_scope() {
        let temp = TempDir::new().unwrap();
        temp.child("ident.json")
            .write_str(r#"{ "type": "Identifier", "name": "x" }"#)
            .unwrap();

        arbor_cmd()
            .current_dir(temp.path())
            .args(["walk", "ident.json"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Identifier"));
    }

    #[test]
    fn no_scope_config_allows_any_root() {
        let temp = TempDir::new().unwrap();
        temp.child("ident.json")
            .write_str(r#"{ "type": "Identifier", "name": "x" }"#)
            .unwrap();
        temp.child("custom.json")
            .write_str(r#"{ "noScope": true }"#)
            .unwrap();

        arbor_cmd()
            .current_dir(temp.path())
            .args(["--config", "custom.json", "walk", "ident.json"])
            .assert()
            .success()
            .stdout("> Identifier\n< Identifier\n");
    }
}

mod has_type_command {
    use super::*;

    #[test]
    fn reports_found_type() {
        let temp = sample_dir();

        arbor_cmd()
            .current_dir(temp.path())
            .args(["has-type", "tree.json", "ThisExpression"])
            .assert()
            .success()
            .stdout("true\n");
    }

    #[test]
    fn blacklist_hides_subtree_and_exits_with_one() {
        let temp = sample_dir();

        arbor_cmd()
            .current_dir(temp.path())
            .args([
                "has-type",
                "tree.json",
                "ThisExpression",
                "--blacklist",
                "FunctionExpression",
            ])
            .assert()
            .code(1)
            .stdout("false\n");
    }

    #[test]
    fn rejects_unknown_type() {
        let temp = sample_dir();

        arbor_cmd()
            .current_dir(temp.path())
            .args(["has-type", "tree.json", "Bogus"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Unknown node type"));
    }
}

mod strip_command {
    use super::*;

    fn stripped(output: &[u8]) -> serde_json::Value {
        serde_json::from_slice(output).unwrap()
    }

    #[test]
    fn removes_transient_properties() {
        let temp = sample_dir();

        let output = arbor_cmd()
            .current_dir(temp.path())
            .args(["strip", "tree.json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let tree = stripped(&output);

        assert!(tree.get("start").is_none());
        let statement = &tree["program"]["body"][0];
        assert!(statement.get("leadingComments").is_none());
        assert!(statement["expression"]["callee"].get("_cached").is_none());
        assert_eq!(statement["expression"]["callee"]["name"], "f");
    }

    #[test]
    fn preserves_comments_on_request() {
        let temp = sample_dir();

        let output = arbor_cmd()
            .current_dir(temp.path())
            .args(["strip", "tree.json", "--preserve-comments"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let tree = stripped(&output);

        assert!(tree["program"]["body"][0].get("leadingComments").is_some());
    }
}

mod keys_command {
    use super::*;

    #[test]
    fn prints_one_entry() {
        arbor_cmd()
            .args(["keys", "CallExpression"])
            .assert()
            .success()
            .stdout("CallExpression: callee, arguments\n");
    }

    #[test]
    fn marks_leaves() {
        arbor_cmd()
            .args(["keys", "Identifier"])
            .assert()
            .success()
            .stdout("Identifier: (leaf)\n");
    }

    #[test]
    fn prints_whole_table() {
        arbor_cmd()
            .arg("keys")
            .assert()
            .success()
            .stdout(predicate::str::contains("File: program\n"))
            .stdout(predicate::str::contains("BinaryExpression: left, right\n"));
    }
}
