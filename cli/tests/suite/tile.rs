use super::strata_command;
use anyhow::Result;
use predicates::str::contains;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

#[test]
fn encode_then_decode_recovers_the_interval() -> Result<()> {
    let output = strata_command()?
        .args(["tile", "encode", "4000", "1000", "--prefix", "5k"])
        .output()?;
    assert!(output.status.success());
    let path = String::from_utf8(output.stdout)?.trim().to_string();
    assert!(path.starts_with("5k-"), "{path}");

    let output = strata_command()?
        .args(["tile", "decode", &path])
        .output()?;
    assert!(output.status.success());
    let decoded: JsonValue = serde_json::from_slice(&output.stdout)?;
    assert_eq!(decoded["earliest"], 4000);
    assert_eq!(decoded["latest"], 1000);
    assert_eq!(decoded["max_bound"], 5000);
    Ok(())
}

#[test]
fn calendar_years_are_accepted() -> Result<()> {
    let output = strata_command()?
        .args(["tile", "encode", "--years", "-6500", "-2000"])
        .output()?;
    assert!(output.status.success());
    let path = String::from_utf8(output.stdout)?;
    let path = path.trim();
    assert!(!path.is_empty());
    assert!(path.chars().all(|digit| "0123".contains(digit)), "{path}");
    Ok(())
}

#[test]
fn bad_digits_are_rejected() -> Result<()> {
    strata_command()?
        .args(["tile", "decode", "0129"])
        .assert()
        .failure()
        .stderr(contains("cannot decode '0129'"));
    Ok(())
}
