#![cfg(feature = "cli")]

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::process::{Command, Output};

const MEMCLI_EXE: &str = env!("CARGO_BIN_EXE_memcli");
const SAMPLE: &str = "tests/fixtures/sample.bin";

fn run(args: &[&str]) -> Output {
    Command::new(MEMCLI_EXE)
        .args(args)
        .output()
        .expect("Failed to run memcli")
}

fn assert_success(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_memcli_shows_help() {
    for flag in ["--help", "help", "-h"] {
        // Act
        let output = run(&[flag]);

        // Assert
        let stdout = assert_success(&output);
        assert!(
            stdout.contains("Usage"),
            "stdout did not look like help text:\n{stdout}"
        );
    }
}

#[test]
fn test_memcli_without_command_fails() {
    // Act
    let output = run(&[]);

    // Assert
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

#[test]
fn test_memcli_inspect_endianness() {
    // Act
    let big = run(&["inspect", SAMPLE, "0", "--type", "u16", "--endian", "be"]);
    let little = run(&["inspect", SAMPLE, "0x0", "--type", "u16"]);

    // Assert
    let stdout = assert_success(&big);
    assert!(stdout.contains("Dec: 4,660"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Hex: 0x1234"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Endianness:  Big"), "unexpected output:\n{stdout}");

    let stdout = assert_success(&little);
    assert!(stdout.contains("Dec: 13,330"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Bin: 00110100 00010010"), "unexpected output:\n{stdout}");
}

#[test]
fn test_memcli_inspect_all_types() {
    // Act
    let output = run(&["inspect", SAMPLE, "2"]);

    // Assert
    let stdout = assert_success(&output);
    for name in ["Int8", "Uint8", "Int32", "Uint64", "HalfFloat", "Double"] {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
    assert!(stdout.contains("Dec: -1"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Hex: 0xffffffff"), "unexpected output:\n{stdout}");
}

#[test]
fn test_memcli_inspect_offset_out_of_file() {
    // Act
    let output = run(&["inspect", SAMPLE, "0x28", "--type", "u8"]);

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "unexpected stderr:\n{stderr}");
}

#[test]
fn test_memcli_inspect_missing_file() {
    // Act
    let output = run(&["inspect", "tests/fixtures/nope.bin", "0"]);

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File not found"), "unexpected stderr:\n{stderr}");
}

#[test]
fn test_memcli_convert_between_types() {
    // Act
    let output = run(&["convert", "-300", "--type", "i16", "--to", "u16"]);

    // Assert
    let stdout = assert_success(&output);
    assert!(stdout.contains("Int16"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Dec: -300"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Hex: 0xfed4"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Uint16"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Dec: 65,236"), "unexpected output:\n{stdout}");
}

#[test]
fn test_memcli_convert_hex_half_float() {
    // Act
    let output = run(&["convert", "0x3c00", "--type", "f16", "--format", "hex"]);

    // Assert
    let stdout = assert_success(&output);
    assert!(stdout.contains("Dec: 1.0"), "unexpected output:\n{stdout}");
    assert!(stdout.contains("Hex: 0x1p+0"), "unexpected output:\n{stdout}");
}

#[test]
fn test_memcli_convert_rejects_out_of_range() {
    // Act
    let output = run(&["convert", "300", "--type", "u8"]);

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "unexpected stderr:\n{stderr}");
}

#[test]
fn test_memcli_convert_requires_type() {
    let output = run(&["convert", "12"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--type"));
}

#[test]
fn test_memcli_dump_rows() {
    // Act
    let output = run(&["dump", SAMPLE, "--cols", "8", "--offset", "0x8", "--rows", "2"]);

    // Assert
    let stdout = assert_success(&output);
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(
        lines,
        vec![
            "08: 6C 6C 6F 2C 20 6D 65 6D  llo, mem",
            "10: 76 69 65 77 21 0A 00 01  view!...",
        ]
    );
}

#[test]
fn test_memcli_dump_with_base_address() {
    // Act
    let output = run(&["dump", SAMPLE, "--base", "0x1000"]);

    // Assert
    let stdout = assert_success(&output);
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1000: 12 34 FF FF FF FF 48 65  6C 6C"));
    assert!(lines[2].starts_with("1020: 0A 0B 0C 0D 0E 0F 10 11 "));
}

#[test]
fn test_memcli_dump_rejects_zero_cols() {
    let output = run(&["dump", SAMPLE, "--cols", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid column count"));
}
