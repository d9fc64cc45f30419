use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// A copy of a fixture batch in a scratch directory, with the CLI pointed at it.
struct BatchEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl BatchEnv {
    fn new(fixture: &str) -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let src = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(fixture);
        let dest = tmp.path().join("scripts");

        let mut options = fs_extra::dir::CopyOptions::new();
        options.content_only = true;
        std::fs::create_dir_all(&dest)?;
        fs_extra::dir::copy(&src, &dest, &options)
            .with_context(|| format!("Failed to copy fixture {:?}", src))?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn sqlrun(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sqlrun"));
        cmd.current_dir(self.root.parent().unwrap_or(&self.root));
        cmd.env_remove("SQLRUN_CONFIG").env_remove("SQLRUN_ENGINE");
        cmd
    }

    fn run(&self) -> Command {
        let mut cmd = self.sqlrun();
        cmd.args(["run", "--engine", "duckdb", "--scripts-dir"])
            .arg(&self.root);
        cmd
    }
}

#[test]
fn test_rejected_script_fails_the_batch_but_not_the_others() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.run()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("✅ 01_create.sql"))
        .stdout(predicate::str::contains("✅ 03_query.sql"))
        .stdout(predicate::str::contains("| NULL  |"))
        .stderr(predicate::str::contains("02_bad.sql: validation error"));
    Ok(())
}

#[test]
fn test_without_validation_the_engine_rejects_the_script() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.run()
        .args(["--validation", "off"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("02_bad.sql: execution error"))
        .stderr(predicate::str::contains("1 of 3 scripts failed"));
    Ok(())
}

#[test]
fn test_selected_scripts_succeed() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.run()
        .args(["--select", "^0[13]_"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS! 2 scripts"))
        .stdout(predicate::str::contains("02_bad.sql").not());
    Ok(())
}

#[test]
fn test_quiet_run_hides_tables() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.run()
        .args(["--select", "^0[13]_", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ 03_query.sql"))
        .stdout(predicate::str::contains("types:").not());
    Ok(())
}

#[test]
fn test_report_is_written_even_when_the_batch_fails() -> Result<()> {
    let env = BatchEnv::new("batch")?;
    let report = env
        .root
        .parent()
        .context("scripts dir has a parent")?
        .join("out/report.json");

    env.run().arg("--report").arg(&report).assert().failure();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report)?)?;
    assert_eq!(json["engine"], "duckdb");
    assert_eq!(json["overall_failed"], true);
    let outcomes = json["verdict"]["outcomes"]
        .as_array()
        .context("outcomes should be an array")?;
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[1]["status"], "failure");
    assert_eq!(outcomes[2]["result_sets"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_missing_scripts_dir_fails_before_running() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.sqlrun()
        .args(["run", "--engine", "duckdb", "--scripts-dir", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load scripts"))
        .stdout(predicate::str::contains("SUCCESS").not());
    Ok(())
}

#[test]
fn test_validate_command_reports_syntax_errors() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.sqlrun()
        .args(["validate", "--engine", "duckdb", "--scripts-dir"])
        .arg(&env.root)
        .assert()
        .failure()
        .stdout(predicate::str::contains("✅ 01_create.sql"))
        .stderr(predicate::str::contains("02_bad.sql"));
    Ok(())
}

#[test]
fn test_config_file_is_picked_up() -> Result<()> {
    let env = BatchEnv::new("batch")?;
    let workdir = env.root.parent().context("scripts dir has a parent")?;
    std::fs::write(
        workdir.join("sqlrun.yaml"),
        "engine: duckdb\nsource:\n  dir: scripts\n  select: \"^01_\"\n",
    )?;

    env.sqlrun()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS! 1 scripts"));
    Ok(())
}

#[test]
fn test_adhoc_query_prints_every_result_set() -> Result<()> {
    let env = BatchEnv::new("batch")?;

    env.sqlrun()
        .args(["query", "SELECT 1 AS one; SELECT 'x' AS two;", "--engine", "duckdb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| one |"))
        .stdout(predicate::str::contains("| two |"));
    Ok(())
}
