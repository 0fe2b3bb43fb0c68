use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("devdocs-custom").unwrap();
    cmd.env_remove("DEVDOCS_PLATFORM")
        .env_remove("DEVDOCS_IMAGE")
        .env_remove("DEVDOCS_BUILD_DIR");
    cmd
}

#[test]
fn test_empty_selection_exits_one_without_work_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let work = tmp.path().join("work");

    cli()
        .arg("--dir")
        .arg(&work)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No documentation sets selected"));

    assert!(!work.exists());
}

#[test]
fn test_unknown_flag_exits_one() {
    let tmp = tempfile::tempdir().unwrap();
    let work = tmp.path().join("work");

    cli()
        .args(["svelte", "--bogus", "--dir"])
        .arg(&work)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));

    assert!(!work.exists());
}

#[test]
fn test_list_groups_needs_no_selection() {
    cli()
        .arg("--list-groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("svelte tailwindcss"));
}

#[test]
fn test_declined_prompt_is_graceful() {
    let tmp = tempfile::tempdir().unwrap();
    let work = tmp.path().join("work");

    cli()
        .args(["svelte", "tailwindcss", "--platform", "linux/arm64", "--dir"])
        .arg(&work)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("linux/arm64"))
        .stdout(predicate::str::contains("Build cancelled"));

    assert!(!work.exists());
}

#[test]
fn test_help_exits_zero() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--minimal"));
}
