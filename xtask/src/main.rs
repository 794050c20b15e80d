// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Xtask utilities for Overlook: running the snapshot gallery and Kompari reports.

use clap::Parser;
use kompari::DirDiffConfig;
use kompari_tasks::args::Command as KompariCommand;
use kompari_tasks::{Actions, Args, Task};
use std::path::{Path, PathBuf};
use std::process::Command;

const USAGE: &str = "Usage: cargo xtask snapshots <kompari-subcommand> [args...]
       cargo xtask snapshots test [--case <pattern>] [--accept|--generate-all] [-- <cargo test args...>]";

struct ActionsImpl;

#[derive(Copy, Clone, Debug)]
enum SnapshotTestMode {
    Normal,
    Accept,
    GenerateAll,
}

impl SnapshotTestMode {
    fn env_value(self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Accept => Some("accept"),
            Self::GenerateAll => Some("generate-all"),
        }
    }
}

impl Actions for ActionsImpl {
    fn generate_all_tests(&self) -> kompari::Result<()> {
        run_generate_all()
    }
}

/// The directory `SnapshotStore::for_crate` uses for `overlook_snapshot`.
fn tests_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("overlook_snapshot")
        .join("tests")
}

fn clean_dir(dir: &Path) -> kompari::Result<()> {
    std::fs::create_dir_all(dir)?;
    for path in kompari::list_image_dir(dir)? {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

fn kompari_args_first(arg: &str) -> bool {
    matches!(
        arg,
        "report" | "review" | "clean" | "dead-snapshots" | "size-check"
    )
}

fn run_kompari(raw_kompari_args: &[String]) -> kompari::Result<()> {
    // Kompari expects its own argv.
    let mut argv = Vec::with_capacity(raw_kompari_args.len() + 1);
    argv.push("xtask".to_string());
    argv.extend_from_slice(raw_kompari_args);
    snapshots_command(Args::parse_from(argv))
}

fn run_generate_all() -> kompari::Result<()> {
    run_snapshot_tests(SnapshotTestMode::GenerateAll, None, Vec::new())
}

fn run_snapshot_tests(
    mode: SnapshotTestMode,
    case: Option<String>,
    extra_args: Vec<String>,
) -> kompari::Result<()> {
    if matches!(mode, SnapshotTestMode::Normal) && !has_references(&tests_path().join("snapshots")) {
        eprintln!(
            "No reference snapshots recorded yet; run `cargo xtask snapshots test --accept` first."
        );
    }

    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let mut cmd = Command::new(cargo);
    cmd.args(["test", "-p", "overlook_snapshot", "--test", "gallery"]);

    if let Some(value) = mode.env_value() {
        cmd.env("OVERLOOK_SNAPSHOT", value);
    }
    if let Some(case) = case {
        cmd.env("OVERLOOK_SNAPSHOT_CASE", case);
    }

    // The gallery is ignored by plain `cargo test`, since it needs recorded references.
    cmd.arg("--");
    cmd.arg("--include-ignored");
    cmd.args(extra_args);
    cmd.status()?;
    Ok(())
}

fn has_references(dir: &Path) -> bool {
    kompari::list_image_dir(dir).is_ok_and(|images| images.into_iter().next().is_some())
}

fn parse_test_args(args: &[String]) -> Result<(SnapshotTestMode, Option<String>, Vec<String>), String> {
    let mut mode = SnapshotTestMode::Normal;
    let mut accept_seen = false;
    let mut generate_all_seen = false;
    let mut case = None::<String>;
    let mut extra_args = Vec::<String>::new();

    let mut i = 0_usize;
    while i < args.len() {
        let arg = &args[i];

        if arg == "--" {
            extra_args.extend_from_slice(&args[i + 1..]);
            break;
        }

        if arg == "--accept" || arg == "--bless" {
            accept_seen = true;
            mode = SnapshotTestMode::Accept;
            i += 1;
            continue;
        }

        if arg == "--generate-all" {
            generate_all_seen = true;
            mode = SnapshotTestMode::GenerateAll;
            i += 1;
            continue;
        }

        if arg == "--case" || arg == "-c" {
            if let Some(value) = args.get(i + 1) {
                case = Some(value.clone());
                i += 2;
                continue;
            }
        } else if let Some(value) = arg.strip_prefix("--case=") {
            case = Some(value.to_string());
            i += 1;
            continue;
        }

        extra_args.push(arg.clone());
        i += 1;
    }

    if accept_seen && generate_all_seen {
        return Err("`--accept` and `--generate-all` are mutually exclusive.".into());
    }
    Ok((mode, case, extra_args))
}

fn snapshots_command(args: Args) -> kompari::Result<()> {
    let tests_path = tests_path();
    let snapshots_path = tests_path.join("snapshots");
    let current_path = tests_path.join("current");

    std::fs::create_dir_all(&snapshots_path)?;
    std::fs::create_dir_all(&current_path)?;

    let mut diff_config = DirDiffConfig::new(snapshots_path, current_path);
    diff_config.set_ignore_right_missing(true);

    match &args.command {
        KompariCommand::Report(_) | KompariCommand::Review(_) => {
            clean_dir(diff_config.right_path())?;
            run_generate_all()?;
            let diff = diff_config.create_diff()?;
            if diff.results().is_empty() {
                println!("No snapshot differences found.");
            }
        }
        KompariCommand::Clean | KompariCommand::DeadSnapshots(_) | KompariCommand::SizeCheck(_) => {
        }
    }

    let mut task = Task::new(diff_config, Box::new(ActionsImpl));
    task.set_report_output_path(tests_path.join("report.html"));
    task.run(&args)?;
    Ok(())
}

fn main() -> kompari::Result<()> {
    // - `cargo xtask report|review|...` runs Kompari on the snapshot gallery.
    // - `cargo xtask snapshots <kompari-subcommand> ...` does the same.
    // - `cargo xtask snapshots test ...` runs the gallery itself.
    let raw = std::env::args().collect::<Vec<_>>();
    let first = raw.get(1).map(String::as_str);

    if first == Some("snapshots") {
        let remaining = &raw[2..];
        match remaining.first().map(String::as_str) {
            None => {
                eprintln!("{USAGE}");
                Ok(())
            }
            Some("test") => match parse_test_args(&remaining[1..]) {
                Ok((mode, case, extra_args)) => run_snapshot_tests(mode, case, extra_args),
                Err(message) => {
                    eprintln!("{message}");
                    Ok(())
                }
            },
            Some(_) => run_kompari(remaining),
        }
    } else if first.is_some_and(kompari_args_first) {
        run_kompari(&raw[1..])
    } else {
        // Let clap print the help or the error.
        snapshots_command(Args::parse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_args_select_mode_and_case() {
        let (mode, case, extra) =
            parse_test_args(&strings(&["--accept", "--case", "iPad*", "--", "--nocapture"]))
                .unwrap();
        assert!(matches!(mode, SnapshotTestMode::Accept));
        assert_eq!(case.as_deref(), Some("iPad*"));
        assert_eq!(extra, ["--nocapture"]);

        let (mode, case, _) = parse_test_args(&strings(&["--case=320", "--generate-all"])).unwrap();
        assert!(matches!(mode, SnapshotTestMode::GenerateAll));
        assert_eq!(case.as_deref(), Some("320"));
    }

    #[test]
    fn empty_or_missing_snapshot_dir_has_no_references() {
        let dir = std::env::temp_dir().join(format!("overlook_xtask_refs_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        assert!(!has_references(&dir));
        std::fs::create_dir_all(&dir).unwrap();
        assert!(!has_references(&dir));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn accept_and_generate_all_conflict() {
        assert!(parse_test_args(&strings(&["--accept", "--generate-all"])).is_err());
    }
}
