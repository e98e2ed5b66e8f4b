//! Integration tests for the gaussblur binary.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn gaussblur() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gaussblur"))
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("gaussblur-cli-{}-{name}", std::process::id()))
}

fn write_solid_ppm(path: &std::path::Path, rgb: [u8; 3]) {
    let mut bytes = b"P6\n6 4\n255\n".to_vec();
    for _ in 0..24 {
        bytes.extend_from_slice(&rgb);
    }
    fs::write(path, bytes).unwrap();
}

#[test]
fn wrong_argument_count_is_usage_error() {
    let output = gaussblur().args(["3", "in.ppm"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn blurs_file() {
    let input = temp_path("solid-in.ppm");
    let output = temp_path("solid-out.ppm");
    write_solid_ppm(&input, [10, 20, 30]);

    let status = gaussblur()
        .arg("4")
        .arg(&input)
        .arg(&output)
        .arg("3")
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(fs::read(&output).unwrap(), fs::read(&input).unwrap());

    let _ = fs::remove_file(input);
    let _ = fs::remove_file(output);
}

#[test]
fn json_report() {
    let input = temp_path("json-in.ppm");
    let output = temp_path("json-out.ppm");
    write_solid_ppm(&input, [1, 2, 3]);

    let out = gaussblur()
        .arg("2")
        .arg(&input)
        .arg(&output)
        .arg("2")
        .args(["--boundary", "clamp", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["width"], 6);
    assert_eq!(report["height"], 4);
    assert_eq!(report["params"]["radius"], 2);
    assert_eq!(report["params"]["boundary"], "clamp-to-edge");

    let _ = fs::remove_file(input);
    let _ = fs::remove_file(output);
}

#[test]
fn invalid_radius_fails() {
    let input = temp_path("radius-in.ppm");
    let output = temp_path("radius-out.ppm");
    write_solid_ppm(&input, [0, 0, 0]);

    let out = gaussblur()
        .arg("-1")
        .arg(&input)
        .arg(&output)
        .arg("2")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid radius -1"));
    assert!(!output.exists());

    let _ = fs::remove_file(input);
}

#[test]
fn missing_input_fails() {
    let out = gaussblur()
        .args(["1", "/nonexistent/in.ppm", "/nonexistent/out.ppm", "1"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("reading"));
}
