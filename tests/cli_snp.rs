use assert_cmd::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn command_snp() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let prefix = tempdir.path().join("allsnp").display().to_string();

    let mut cmd = Command::cargo_bin("orthocat")?;
    cmd.arg("snp")
        .arg("tests/snp/all.fas")
        .arg("--min")
        .arg("0")
        .arg("--fasta")
        .arg("-o")
        .arg(&prefix)
        .assert()
        .success();

    // columns 0, 11, 14 and 16; column 4 holds a gap
    let phy = std::fs::read_to_string(format!("{}.phy", prefix))?;
    assert_eq!(phy, "3 4\nA ATGA\nB TTGT\nC AACA\n");

    let fas = std::fs::read_to_string(format!("{}.fas", prefix))?;
    assert_eq!(fas, ">A\nATGA\n>B\nTTGT\n>C\nAACA\n");
    assert!(tempdir.path().join("allsnp.aln").exists());

    Ok(())
}

#[test]
fn command_snp_no_sites() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let prefix = tempdir.path().join("allsnp").display().to_string();

    // no column has two rows differing from the first one
    let mut cmd = Command::cargo_bin("orthocat")?;
    let output = cmd
        .arg("snp")
        .arg("tests/snp/all.fas")
        .arg("--min")
        .arg("1")
        .arg("-o")
        .arg(&prefix)
        .output()?;
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("no informative sites"));
    assert!(!tempdir.path().join("allsnp.phy").exists());

    Ok(())
}

#[test]
fn command_snp_gap_only_variation() -> anyhow::Result<()> {
    let tempdir = TempDir::new()?;
    let prefix = tempdir.path().join("allsnp").display().to_string();

    let mut cmd = Command::cargo_bin("orthocat")?;
    let output = cmd
        .arg("snp")
        .arg("tests/snp/same.aln")
        .arg("--min")
        .arg("0")
        .arg("-o")
        .arg(&prefix)
        .output()?;
    assert!(output.status.success());
    assert!(!tempdir.path().join("allsnp.phy").exists());

    Ok(())
}

#[test]
fn command_snp_bad_alignment() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("orthocat")?;
    let output = cmd
        .arg("snp")
        .arg("tests/concat/bad.aln")
        .arg("--min")
        .arg("0")
        .output()?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("different lengths"));

    Ok(())
}
