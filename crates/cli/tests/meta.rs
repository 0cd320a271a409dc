use assert_cmd::Command;
use chrono::{TimeZone, Utc};
use predicates::prelude::*;
use refig_record::ProvenanceRecord;
use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn chunk(kind: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    out
}

fn tiny_png() -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    out.extend_from_slice(&chunk(b"IHDR", &[0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]));
    out.extend_from_slice(&chunk(b"IDAT", &[0x78, 0x9C, 0x62, 0x00, 0x01]));
    out.extend_from_slice(&chunk(b"IEND", &[]));
    out
}

fn sample_record() -> ProvenanceRecord {
    ProvenanceRecord::new(
        "loss_curve.png",
        Utc.with_ymd_and_hms(2026, 8, 24, 10, 30, 45).unwrap(),
    )
    .with_source("/work/train.ipynb")
    .with_git_commit("d4e5f6")
}

#[allow(deprecated)]
fn refig() -> Command {
    Command::cargo_bin("refig").expect("binary")
}

#[test]
fn meta_prints_the_embedded_record() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("loss_curve.png");
    let annotated = refig_codec::embed(&tiny_png(), &sample_record()).expect("embed");
    std::fs::write(&path, annotated).expect("write fixture");

    refig()
        .arg("meta")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"d4e5f6\""))
        .stdout(predicate::str::contains("created_at"))
        .stdout(predicate::str::contains("/work/train.ipynb"));
}

#[test]
fn meta_on_svg_figures_works_too() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("spectrum.svg");
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="4" height="4"/></svg>"#;
    let annotated = refig_codec::embed(svg, &sample_record()).expect("embed");
    std::fs::write(&path, annotated).expect("write fixture");

    refig()
        .arg("meta")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"d4e5f6\""));
}

#[test]
fn meta_without_a_record_exits_two() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("plain.png");
    std::fs::write(&path, tiny_png()).expect("write fixture");

    refig()
        .arg("meta")
        .arg(&path)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no embedded metadata"));
}

#[test]
fn meta_on_an_unsupported_file_exits_one() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("notes.txt");
    std::fs::write(&path, b"just text, not an image").expect("write fixture");

    refig()
        .arg("meta")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsupported image format"));
}

#[test]
fn meta_on_a_missing_file_exits_one() {
    let temp = TempDir::new().expect("tempdir");

    refig()
        .arg("meta")
        .arg(temp.path().join("nope.png"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}
