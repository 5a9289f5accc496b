use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn command_xmfa() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("orthocat")?;
    let output = cmd
        .arg("xmfa")
        .arg("tests/concat/g2.aln")
        .arg("tests/concat/bad.aln")
        .arg("tests/concat/g3.fas")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;

    // incomplete genes are kept, unreadable ones skipped
    assert_eq!(
        stdout,
        "#g2.aln\n>A\nTTGACA\n>B\nTTGAC-\n=\n#g3.fas\n>A\nACGTAC\n>B\nACGTTC\n>C\nACCTAC\n=\n"
    );

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("bad.aln"));

    Ok(())
}
