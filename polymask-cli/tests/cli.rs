// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::Path;

use assert_cmd::Command;
use image::{Rgb, RgbImage, Rgba};
use predicates::prelude::*;

fn write_job(directory: &Path, labels: &str, images: &str) {
    std::fs::write(
        directory.join("annotations.xml"),
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<annotations>
  <version>1.1</version>
  <meta><job><labels>{}</labels></job></meta>
  {}
</annotations>"#,
            labels, images
        ),
    )
    .unwrap();
}

fn write_image(path: &Path) {
    RgbImage::from_pixel(20, 20, Rgb([40, 80, 120]))
        .save(path)
        .unwrap();
}

fn polymask() -> Command {
    let mut cmd = Command::cargo_bin("polymask").unwrap();
    cmd.env_remove("POLYMASK_API_URL")
        .env_remove("POLYMASK_USERNAME")
        .env_remove("POLYMASK_PASSWORD")
        .env_remove("POLYMASK_RESULT");
    cmd
}

#[test]
fn test_draw_job_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("7.jpeg"));
    write_image(&dir.path().join("8.jpeg"));
    write_job(
        dir.path(),
        "<label><name>cat</name><color>#FF0000</color></label>",
        r#"<image id="7" name="frame_000007.jpeg">
             <polygon label="cat" points="0,0;10,0;0,10"/>
           </image>
           <image id="8" name="frame_000008.jpeg"/>"#,
    );

    polymask()
        .args(["draw", "-v", "-i"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 masks drawn"));

    let output = dir.path().join("7.png");
    assert!(output.exists());
    assert!(!dir.path().join("7.jpeg").exists());
    assert!(dir.path().join("8.jpeg").exists());
    assert!(!dir.path().join("annotations.xml").exists());

    let composited = image::open(output).unwrap().to_rgba8();
    assert_eq!(composited.get_pixel(2, 2), &Rgba([255, 0, 0, 255]));
}

#[test]
fn test_draw_missing_label_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("3.jpeg"));
    write_job(
        dir.path(),
        "<label><name>cat</name><color>#FF0000</color></label>",
        r#"<image id="3"><polygon label="unknown" points="0,0;10,0;0,10"/></image>"#,
    );

    polymask()
        .args(["draw", "-i"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("MissingLabelColorError"));

    assert!(!dir.path().join("3.png").exists());
    assert!(dir.path().join("3.jpeg").exists());
}

#[test]
fn test_draw_malformed_polygon_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("3.jpeg"));
    write_job(
        dir.path(),
        "<label><name>cat</name><color>#FF0000</color></label>",
        r#"<image id="3"><polygon label="cat" points="0,0;10;0,10"/></image>"#,
    );

    polymask()
        .args(["draw", "-i"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("MalformedAnnotationError"));
}

#[test]
fn test_draw_missing_directory_fails() {
    polymask()
        .args(["draw", "-i", "does_not_exist/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_download_requires_jobs() {
    polymask()
        .args(["download", "--api-url", "http://127.0.0.1:9", "-u", "a", "-p", "b"])
        .assert()
        .failure();
}

#[test]
fn test_download_unreachable_service_fails_job() {
    let dir = tempfile::tempdir().unwrap();

    polymask()
        .args(["download", "1", "--attempts", "1", "-u", "a", "-p", "b"])
        .args(["--api-url", "http://127.0.0.1:9", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Job 1 failed"));
}

#[test]
fn test_download_reads_credentials_from_env() {
    let dir = tempfile::tempdir().unwrap();

    polymask()
        .env("POLYMASK_API_URL", "http://127.0.0.1:9")
        .env("POLYMASK_USERNAME", "a")
        .env("POLYMASK_PASSWORD", "b")
        .args(["download", "2", "--attempts", "1", "-o"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Job 2 failed"));
}
