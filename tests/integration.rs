// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Integration tests for chat2html rendering and the command-line interface.

use chat2html::{Config, ContentBlock, compose, render_markup, render_preview, transcript};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn samples_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("samples")
}

fn load_sample_blocks(path: &Path) -> Vec<ContentBlock> {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    if path.extension().is_some_and(|ext| ext == "json") {
        transcript::parse_blocks(&text)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
    } else {
        vec![transcript::block_from_text("sample", &text)]
    }
}

fn dark_theme() -> Config {
    let json = fs::read_to_string(samples_dir().join("themes/dark.json"))
        .expect("Failed to read dark theme");
    Config::from_json(&json).expect("Failed to parse dark theme")
}

/// Renders every sample transcript with both the default and the dark theme.
#[test]
fn renders_all_sample_transcripts() {
    let dir = samples_dir();
    if !dir.exists() {
        // Skip if no samples directory
        return;
    }

    for entry in fs::read_dir(&dir).expect("Failed to read samples directory") {
        let path = entry.expect("Failed to read directory entry").path();
        if !path
            .extension()
            .is_some_and(|ext| ext == "json" || ext == "txt")
        {
            continue;
        }

        let blocks = load_sample_blocks(&path);
        for config in [Config::default(), dark_theme()] {
            let html = render_markup(&blocks, &config);
            assert!(
                html.starts_with("<div style=\"max-width: "),
                "Invalid container in {}",
                path.display()
            );
            assert!(html.ends_with("</div>"), "Unclosed container in {}", path.display());

            let live = render_preview(&blocks, &config).expect("sample renders");
            assert_eq!(live.outer_markup(), html, "Writers disagree on {}", path.display());
        }
    }
}

/// The reference transcript: heading, AI bubble, user bubble, narration.
#[test]
fn end_to_end_reference_transcript() {
    let block = ContentBlock::new(
        0,
        "Block 1",
        "## Hello\n>> Hi there\n<< Hi!\nSome narration with **bold** and \"quoted\" text.",
    );
    let node = compose(std::slice::from_ref(&block), &Config::default())
        .expect("block is contentful");
    let root = node.as_element().unwrap();
    assert_eq!(root.children.len(), 4);

    let html = render_markup(&[block], &Config::default());
    assert!(html.contains(r#"<p style="margin: 0 0 0.6em 0; font-size: 1.25em; font-weight: 700; color: #18181b; line-height: 1.4;">Hello</p>"#));
    assert!(html.contains(r#"<div style="text-align: left; margin: 1.5em 0 0.5em 0;">"#));
    assert!(html.contains(r#"<div style="text-align: right; margin: 0 0 0.5em 0;">"#));
    assert!(html.contains(r#"<strong style="font-weight: bold; color: #dc2626;">bold</strong>"#));
    assert!(html.contains(r#"border-radius: 4px;">"quoted"</span>"#));
}

#[test]
fn block_list_skips_blank_blocks_but_keeps_them() {
    let blocks = load_sample_blocks(&samples_dir().join("chapters.json"));
    assert_eq!(blocks.len(), 3);
    assert!(!blocks[2].is_contentful());

    let html = render_markup(&blocks, &Config::default());
    assert!(html.contains(">Prologue</p>"));
    assert!(html.contains("▼ Chapter 1"));
    assert!(!html.contains("Notes"));
}

#[test]
fn user_text_is_escaped_everywhere() {
    let blocks = [ContentBlock::new(
        0,
        "<script>",
        "<script>alert(1)</script>\n>> a & b <i>\n<< <b>x</b>\n## <h1>",
    )];
    let config = Config {
        title: "</div><script>".into(),
        char_name: "<em>".into(),
        ..Config::default()
    };
    let html = render_markup(&blocks, &config);
    assert!(!html.contains("<script"));
    assert!(!html.contains("<i>"));
    assert!(!html.contains("<b>"));
    assert!(!html.contains("<h1>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("a &amp; b"));
}

#[test]
fn image_sources_are_preserved_verbatim() {
    let src = "https://cdn.example.com/a.png?w=640&h=480";
    let blocks = [ContentBlock::new(
        0,
        "t",
        format!("<img src=\"{src}\">\nLook: <img src=\"{src}\"> **wow**\n>> <img src=\"{src}\">"),
    )];
    let html = render_markup(&blocks, &Config::default());
    assert_eq!(html.matches(&format!("<img src=\"{src}\"")).count(), 3);
}

#[test]
fn config_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("theme.json");

    let config = Config {
        char_name: "Mira".into(),
        bubble_gradient: true,
        bubble_opacity: 80.0,
        ..dark_theme()
    };
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = Config::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn dark_theme_flips_bubble_text_color() {
    let blocks = [ContentBlock::new(0, "t", ">> hi\n<< hey")];
    let html = render_markup(&blocks, &dark_theme());
    assert!(html.contains("color: #f5f5f5;"));
    assert!(html.contains("border-left: 1px solid"));
    assert!(html.contains("border-right: 1px solid"));
    assert!(html.contains("linear-gradient(135deg, #18181b 0%, #09090b 100%)"));
}

fn chat2html() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chat2html"))
}

#[test]
fn cli_renders_directory_and_respects_force() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("one.txt"), ">> hello").unwrap();
    fs::write(
        input.path().join("two.json"),
        r#"[{"title": "A", "content": "<< hi"}]"#,
    )
    .unwrap();
    fs::write(input.path().join("ignored.md"), "# nope").unwrap();

    let status = chat2html()
        .arg("-q")
        .arg("-o")
        .arg(output.path())
        .arg(input.path())
        .status()
        .unwrap();
    assert!(status.success());

    let one = fs::read_to_string(output.path().join("one.html")).unwrap();
    assert!(one.contains("hello</div>"));
    assert!(output.path().join("two.html").exists());
    assert!(!output.path().join("ignored.html").exists());

    // Existing output is kept without --force
    fs::write(input.path().join("one.txt"), ">> changed").unwrap();
    let status = chat2html()
        .arg("-q")
        .arg("-o")
        .arg(output.path())
        .arg(input.path().join("one.txt"))
        .status()
        .unwrap();
    assert!(status.success());
    let kept = fs::read_to_string(output.path().join("one.html")).unwrap();
    assert!(kept.contains("hello"));

    let status = chat2html()
        .args(["-q", "-f", "-o"])
        .arg(output.path())
        .arg(input.path().join("one.txt"))
        .status()
        .unwrap();
    assert!(status.success());
    let replaced = fs::read_to_string(output.path().join("one.html")).unwrap();
    assert!(replaced.contains("changed"));
}

#[test]
fn cli_concat_to_stdout_with_config_and_title() {
    let input = tempfile::tempdir().unwrap();
    let first = input.path().join("a.txt");
    let second = input.path().join("b.txt");
    fs::write(&first, ">> first").unwrap();
    fs::write(&second, "<< second").unwrap();
    let config = input.path().join("theme.json");
    fs::write(&config, r#"{"aiModel": "m-1"}"#).unwrap();

    let out = chat2html()
        .args(["--concat", "-o", "-", "--title", "Merged", "-c"])
        .arg(&config)
        .arg(&first)
        .arg(&second)
        .output()
        .unwrap();
    assert!(out.status.success());

    let html = String::from_utf8(out.stdout).unwrap();
    assert!(html.contains(">Merged</div>"));
    assert!(html.contains(">m-1</span>"));
    // Two inputs become two labeled sections
    assert!(html.contains(">a</p>"));
    assert!(html.contains(">b</p>"));
}

#[test]
fn cli_preview_writes_live_tree_json() {
    let input = tempfile::tempdir().unwrap();
    let path = input.path().join("chat.txt");
    fs::write(&path, ">> hi").unwrap();

    let out = chat2html()
        .args(["--preview", "-o", "-"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(out.status.success());

    let tree: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(tree["type"], "element");
    assert_eq!(tree["tag"], "div");
    assert_eq!(tree["style"][0]["name"], "max-width");
}

#[test]
fn cli_rejects_bad_inputs() {
    let input = tempfile::tempdir().unwrap();
    let broken = input.path().join("broken.json");
    fs::write(&broken, "[{").unwrap();
    let out = chat2html().args(["-o", "-"]).arg(&broken).output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("broken.json"));

    let ok = input.path().join("ok.txt");
    fs::write(&ok, "x").unwrap();
    let out = chat2html()
        .args(["-o", "-"])
        .arg(&ok)
        .arg(&ok)
        .output()
        .unwrap();
    assert!(!out.status.success());

    let config = input.path().join("config.json");
    fs::write(&config, "[1]").unwrap();
    let out = chat2html()
        .args(["-o", "-", "-c"])
        .arg(&config)
        .arg(&ok)
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn cli_reports_directory_without_transcripts() {
    let input = tempfile::tempdir().unwrap();
    fs::write(input.path().join("notes.md"), "# nothing here").unwrap();

    let out = chat2html()
        .args(["-o", "-"])
        .arg(input.path())
        .output()
        .unwrap();
    assert!(!out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("NoInputFiles"));
    assert!(!stderr.contains("MultipleFilesToStdout"));
}
