use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn command_pl_help() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("orthocat")?;
    let output = cmd.arg("pl").arg("--help").output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("makeblastdb"));
    assert!(stdout.contains("--concat"));
    assert!(stdout.contains("--snps"));
    assert!(stdout.contains("--workdir"));

    Ok(())
}

#[test]
fn command_pl_bad_list() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("orthocat")?;
    cmd.arg("pl")
        .arg("tests/collect/refs.fna")
        .arg("tests/collect/absent.lst")
        .assert()
        .failure()
        .stderr(predicates::str::contains("absent.lst"));

    Ok(())
}
