// Integration tests for the rtbl binary.
// Run with: cargo test -p retable-cli --test cli_tests

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn rtbl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rtbl"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

// ---------------------------------------------------------------------------
// compute writes the derived column as CSV to stdout
// ---------------------------------------------------------------------------

#[test]
fn compute_adds_column() {
    let output = rtbl()
        .args([
            "compute",
            fixture("orders.csv").to_str().unwrap(),
            "--formula",
            "qty * price",
            "--into",
            "total",
        ])
        .output()
        .expect("rtbl compute");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "item,qty,price,total\napples,2,5,10\npears,3,4,12\n");
}

// ---------------------------------------------------------------------------
// engine errors exit 1 with a message on stderr, nothing on stdout
// ---------------------------------------------------------------------------

#[test]
fn rename_missing_column_fails() {
    let output = rtbl()
        .args([
            "rename",
            fixture("orders.csv").to_str().unwrap(),
            "--from",
            "cost",
            "--to",
            "price2",
        ])
        .output()
        .expect("rtbl rename");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'cost' does not exist"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn compute_division_by_zero_fails() {
    let output = rtbl()
        .args([
            "compute",
            fixture("orders.csv").to_str().unwrap(),
            "--formula",
            "qty / 0",
        ])
        .output()
        .expect("rtbl compute");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("division by zero"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// show prints an aligned grid with headers and a row count
// ---------------------------------------------------------------------------

#[test]
fn show_prints_grid() {
    let output = rtbl()
        .args(["show", fixture("orders.csv").to_str().unwrap()])
        .output()
        .expect("rtbl show");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("item"), "stdout: {stdout}");
    assert!(stdout.contains("apples"), "stdout: {stdout}");
    assert!(stdout.contains("(2 rows)"), "stdout: {stdout}");
}

// ---------------------------------------------------------------------------
// transpose round-trips through a file output
// ---------------------------------------------------------------------------

#[test]
fn transpose_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("transposed.csv");

    let output = rtbl()
        .args([
            "transpose",
            fixture("orders.csv").to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("rtbl transpose");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, "field,apples,pears\nqty,2,3\nprice,5,4\n");
}

// ---------------------------------------------------------------------------
// session: scripted via stdin; undo restores the previous table
// ---------------------------------------------------------------------------

#[test]
fn session_compute_undo_history() {
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("result.csv");

    let mut child = rtbl()
        .args(["session", fixture("orders.csv").to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("rtbl session");

    let script = format!(
        "compute total = qty * price\nundo\nrename qty quantity\nhistory\nsave {}\nquit\n",
        saved.display()
    );
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();

    let output = child.wait_with_output().expect("session exit");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("undone"), "stdout: {stdout}");
    assert!(stdout.contains("Rename column 'qty' to 'quantity'"), "stdout: {stdout}");

    // the computed column was undone; only the rename survived
    let written = std::fs::read_to_string(&saved).unwrap();
    assert_eq!(written, "item,quantity,price\napples,2,5\npears,3,4\n");
}

#[test]
fn session_error_leaves_table_intact() {
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("result.csv");

    let mut child = rtbl()
        .args(["session", fixture("orders.csv").to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("rtbl session");

    let script = format!("compute x = qty / 0\nsave {}\nquit\n", saved.display());
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();

    let output = child.wait_with_output().expect("session exit");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("division by zero"), "stdout: {stdout}");

    let written = std::fs::read_to_string(&saved).unwrap();
    assert_eq!(written, "item,qty,price\napples,2,5\npears,3,4\n");
}
