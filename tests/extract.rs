use std::io::Write;
use std::path::{Path, PathBuf};

use blockdoc::extract;
use blockdoc::model::{BlockKind, Options, Run, Selection, Severity};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn run_with(options: Options) -> (Run, Vec<Value>) {
    let mut buf = Vec::new();
    let run = extract(&options, &mut buf).expect("extraction succeeds");
    let records = String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is one JSON value"))
        .collect();
    (run, records)
}

fn run_files(names: &[&str]) -> (Run, Vec<Value>) {
    run_with(Options {
        files: names.iter().map(|n| fixture(n)).collect(),
        ..Options::default()
    })
}

fn ids(records: &[Value]) -> Vec<u64> {
    records.iter().map(|r| r["id"].as_u64().unwrap()).collect()
}

fn messages(run: &Run) -> Vec<&str> {
    run.diagnostics
        .entries
        .iter()
        .map(|d| d.message.as_str())
        .collect()
}

#[test]
fn awk_file_yields_generic_and_function_records() {
    let (run, records) = run_files(&["stats.awk"]);
    assert!(run.diagnostics.entries.is_empty());
    assert_eq!(ids(&records), vec![0, 1, 2]);

    let file = fixture("stats.awk").display().to_string();
    assert_eq!(
        records[0],
        json!({
            "id": 0,
            "type": "generic",
            "markup": "md",
            "file": file,
            "lines": {"initial": 3, "total": 3},
            "content": ["# stats.awk", "", "Column statistics for whitespace-separated input."]
        })
    );

    assert_eq!(
        records[1],
        json!({
            "id": 1,
            "type": "function",
            "markup": "function",
            "file": file,
            "lines": {"initial": 9, "total": 9},
            "content": {
                "name": "mean",
                "short-description": "arithmetic mean of an array",
                "members": [
                    {"name": "arr", "description": "array of numbers indexed from 1"},
                    {"name": "n", "description": "number of elements in the array"},
                    {"name": "@return", "description": "the mean, or 0 for an empty array"}
                ],
                "description": [
                    {"heading": "Note", "paragraph": "integer inputs still produce a floating point result."}
                ]
            }
        })
    );

    assert_eq!(records[2]["lines"], json!({"initial": 25, "total": 2}));
    assert_eq!(records[2]["content"]["name"], "max");
    assert_eq!(records[2]["content"]["short-description"], "largest element");
}

#[test]
fn shell_file_drops_and_warns() {
    let (run, records) = run_files(&["deploy.sh"]);

    // block 2 (`struct config`) is discovered but never emitted
    assert_eq!(run.blocks.len(), 5);
    assert_eq!(ids(&records), vec![0, 1, 3, 4]);
    assert_eq!(
        messages(&run),
        vec!["ignoring non-function block", "unclosed block"]
    );
    assert_eq!(run.diagnostics.entries[1].line, 22);

    assert_eq!(records[1]["content"]["name"], "sync_tree");
    assert_eq!(
        records[1]["content"]["members"],
        json!([{"name": "1", "description": "destination host"}])
    );

    assert_eq!(records[2]["type"], "generic");
    assert_eq!(records[2]["markup"], "none");
    assert_eq!(records[2]["content"], json!(["restart - restart the service"]));

    // `##!function` forces a function block even though `##` closed it
    assert_eq!(records[3]["type"], "function");
    assert_eq!(records[3]["markup"], "function");
    assert_eq!(records[3]["content"]["name"], "reload");
}

#[test]
fn c_file_handles_empty_and_trailing_blocks() {
    let (run, records) = run_files(&["buffer.c"]);

    assert_eq!(ids(&records), vec![0, 1, 3]);
    assert_eq!(records[0]["markup"], "txt");
    assert_eq!(records[1]["content"]["name"], "buf_push");
    assert_eq!(
        records[1]["content"]["members"][2],
        json!({"name": "@return", "description": "0 on success"})
    );

    // unterminated block at end of file: emitted, no unclosed warning
    assert_eq!(
        records[2]["content"],
        json!(["Trailing block that never closes", ""])
    );
    assert_eq!(
        messages(&run),
        vec!["empty function block", "missing title in function block"]
    );
    assert_eq!(run.diagnostics.entries[1].severity, Severity::Error);
}

#[test]
fn unknown_filetype_only_yields_generic_blocks() {
    let (run, records) = run_files(&["notes.txt"]);

    assert!(run.blocks.iter().all(|b| b.kind == BlockKind::Generic));
    assert_eq!(records.len(), 2);
    assert_eq!(messages(&run), vec!["unclosed block"]);
}

#[test]
fn default_filetype_applies_to_unknown_extensions() {
    let (run, records) = run_with(Options {
        files: vec![fixture("notes.txt")],
        default_filetype: Some("sh".into()),
        ..Options::default()
    });

    assert!(run.diagnostics.entries.is_empty());
    assert_eq!(records[1]["type"], "function");
    assert_eq!(records[1]["content"]["name"], "second");
}

#[test]
fn ids_are_contiguous_across_files() {
    let (run, _) = run_files(&["stats.awk", "deploy.sh", "buffer.c", "notes.txt"]);

    let ids: Vec<_> = run.blocks.iter().map(|b| b.id).collect();
    assert_eq!(ids, (0..run.blocks.len()).collect::<Vec<_>>());
    assert_eq!(run.blocks.len(), 3 + 5 + 4 + 2);
    assert_eq!(run.blocks[3].file, fixture("deploy.sh").display().to_string());
}

#[test]
fn selection_filters_records_but_not_ids() {
    let files: Vec<_> = ["stats.awk", "deploy.sh"].iter().map(|n| fixture(n)).collect();

    let (_, functions) = run_with(Options {
        files: files.clone(),
        selection: Selection::Functions,
        ..Options::default()
    });
    assert_eq!(ids(&functions), vec![1, 2, 4, 7]);
    assert!(functions.iter().all(|r| r["type"] == "function"));

    let (_, generic) = run_with(Options {
        files,
        selection: Selection::Generic,
        ..Options::default()
    });
    assert_eq!(ids(&generic), vec![0, 3, 6]);
}

#[test]
fn output_is_deterministic() {
    let render = || {
        let mut buf = Vec::new();
        let options = Options {
            files: vec![fixture("stats.awk"), fixture("buffer.c")],
            ..Options::default()
        };
        extract(&options, &mut buf).unwrap();
        buf
    };
    assert_eq!(render(), render());
}

#[test]
fn missing_input_aborts_the_run() {
    let mut buf = Vec::new();
    let options = Options {
        files: vec![fixture("stats.awk"), fixture("missing.sh"), fixture("deploy.sh")],
        ..Options::default()
    };

    let err = extract(&options, &mut buf).unwrap_err();
    assert!(err.to_string().contains("missing.sh"));

    // records of the first file were already written and stay valid
    let out = String::from_utf8(buf).unwrap();
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn continuation_lines_join_with_single_spaces() {
    let mut tmp = tempfile::Builder::new().suffix(".sh").tempfile().unwrap();
    writeln!(
        tmp,
        "##\n# f - short\n# @x: foo\n#   bar\n# Body: one\n# @y: two\nf() {{"
    )
    .unwrap();

    let (_, records) = run_with(Options {
        files: vec![tmp.path().to_path_buf()],
        ..Options::default()
    });

    assert_eq!(
        records[0]["content"],
        json!({
            "name": "f",
            "short-description": "short",
            "members": [{"name": "x", "description": "foo bar Body: one"}, {"name": "y", "description": "two"}],
            "description": []
        })
    );
}
