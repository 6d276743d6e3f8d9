//! Tests for the dumpnote CLI tool including:
//! - Readable text dump (default)
//! - JSON dump (-j)
//! - Error reporting for unparseable input

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Run dumpnote with the given arguments.
fn run_dumpnote(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dumpnote"))
        .args(args)
        .output()
        .expect("failed to execute dumpnote")
}

/// Synthesize a single-page .note container.
fn fixture_note() -> Vec<u8> {
    let mut buf = b"note".to_vec();
    buf.extend_from_slice(b"SN_FILE_VER_20230015");
    let push = |buf: &mut Vec<u8>, data: &[u8]| -> u32 {
        let address = buf.len() as u32;
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(data);
        address
    };
    let bitmap = push(&mut buf, &[0x61, 0x04]);
    let layer = push(
        &mut buf,
        format!("<LAYERPROTOCOL:RATTA_RLE><LAYERBITMAP:{bitmap}>").as_bytes(),
    );
    let page = push(&mut buf, format!("<MAINLAYER:{layer}>").as_bytes());
    let footer = push(&mut buf, format!("<PAGE1:{page}>").as_bytes());
    if buf.len() < 96 {
        buf.resize(96, 0);
    }
    buf.extend_from_slice(&footer.to_le_bytes());
    buf
}

fn write_fixture(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("manta-dumpnote-{}-{name}", std::process::id()));
    fs::write(&path, fixture_note()).expect("failed to write fixture");
    path
}

#[test]
fn text_dump_lists_structure() {
    let input = write_fixture("text.note");
    let output = run_dumpnote(&[input.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("signature: SN_FILE_VER_20230015"));
    assert!(text.contains("resolution: 1404x1872"));
    assert!(text.contains("pages: 1"));
    assert!(text.contains("MAINLAYER"));
    assert!(text.contains("protocol=RATTA_RLE"));

    let _ = fs::remove_file(input);
}

#[test]
fn json_dump_round_trips() {
    let input = write_fixture("json.note");
    let output = run_dumpnote(&["-j", input.to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("invalid JSON dump");
    assert_eq!(value["signature"], "SN_FILE_VER_20230015");
    assert_eq!(value["width"], 1404);
    assert_eq!(value["height"], 1872);
    assert_eq!(value["pages"][0]["number"], 1);
    assert_eq!(value["pages"][0]["layers"][0]["name"], "MAINLAYER");
    assert_eq!(value["pages"][0]["layers"][0]["protocol"], "RATTA_RLE");

    let _ = fs::remove_file(input);
}

#[test]
fn unparseable_input_reports_failure() {
    let path = std::env::temp_dir().join(format!("manta-dumpnote-{}-bad.note", std::process::id()));
    fs::write(&path, b"not a note container").unwrap();
    let output = run_dumpnote(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot parse"));

    let _ = fs::remove_file(path);
}
