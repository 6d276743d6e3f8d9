//! Tests for the note2pdf CLI tool including:
//! - Default output path (input with .pdf extension)
//! - Output to stdout (-o -)
//! - Page selection (-p) and page cap (-m)
//! - Error reporting for unconvertible input

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Run note2pdf with the given arguments.
fn run_note2pdf(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_note2pdf"))
        .args(args)
        .output()
        .expect("failed to execute note2pdf")
}

/// Synthesize a minimal .note container with `pages` single-layer pages.
fn fixture_note(pages: usize) -> Vec<u8> {
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
    let mut footer = String::new();
    for n in 1..=pages {
        let page = push(&mut buf, format!("<MAINLAYER:{layer}>").as_bytes());
        footer.push_str(&format!("<PAGE{n}:{page}>"));
    }
    let footer_addr = push(&mut buf, footer.as_bytes());
    if buf.len() < 96 {
        buf.resize(96, 0);
    }
    buf.extend_from_slice(&footer_addr.to_le_bytes());
    buf
}

/// Write a fixture into the temp dir under a unique name.
fn write_fixture(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("manta-note2pdf-{}-{name}", std::process::id()));
    fs::write(&path, bytes).expect("failed to write fixture");
    path
}

#[test]
fn writes_pdf_next_to_input_by_default() {
    let input = write_fixture("default.note", &fixture_note(1));
    let output = run_note2pdf(&[input.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let pdf_path = input.with_extension("pdf");
    let pdf = fs::read(&pdf_path).expect("output pdf missing");
    assert!(pdf.starts_with(b"%PDF-1.4"));

    let _ = fs::remove_file(input);
    let _ = fs::remove_file(pdf_path);
}

#[test]
fn stdout_output_is_the_pdf_stream() {
    let input = write_fixture("stdout.note", &fixture_note(1));
    let output = run_note2pdf(&["-o", "-", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(output.stdout.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("/Count 1"));

    let _ = fs::remove_file(input);
}

#[test]
fn page_selection_and_cap() {
    let input = write_fixture("pages.note", &fixture_note(3));

    let output = run_note2pdf(&["-p", "1,3", "-o", "-", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("/Count 2"));

    let output = run_note2pdf(&["-m", "1", "-o", "-", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("/Count 1"));

    let _ = fs::remove_file(input);
}

#[test]
fn outfile_with_multiple_inputs_rejected() {
    let a = write_fixture("multi-a.note", &fixture_note(1));
    let b = write_fixture("multi-b.note", &fixture_note(1));
    let output = run_note2pdf(&["-o", "out.pdf", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--outfile"));

    let _ = fs::remove_file(a);
    let _ = fs::remove_file(b);
}

#[test]
fn unconvertible_input_reports_failure() {
    let input = write_fixture("garbage.note", b"ten bytes.");
    let output = run_note2pdf(&["-o", "-", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("conversion failed"));
    assert!(output.stdout.is_empty());

    let _ = fs::remove_file(input);
}
