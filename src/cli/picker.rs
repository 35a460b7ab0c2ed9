//! Interactive CSV picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `sales --pick` and choose a file" UX
//!
//! The same discovery routine feeds the TUI's source cycling, so discovery
//! order must be deterministic.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth for finding CSV files.
const SEARCH_DEPTH: usize = 4;

/// Directories that never contain user data.
const SKIP_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// Prompt the user to select a CSV file from the current directory tree.
///
/// Accepts a number from the printed list or an explicit path; `q` cancels.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files();
    if files.is_empty() {
        return Err(AppError::input(
            "No .csv files found under the current directory. \
             Provide one with `sales report -f <file.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    loop {
        print!(
            "Select a file by number (1-{}) or type a path (q to quit): ",
            files.len()
        );
        io::stdout()
            .flush()
            .map_err(|e| AppError::input(format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::input(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::input(
                "No input received. Provide a CSV path with `sales report -f <file.csv>`.",
            ));
        }

        match parse_selection(input.trim(), &files) {
            Selection::Quit => return Err(AppError::input("Canceled.")),
            Selection::Chosen(path) => return Ok(path),
            Selection::Retry(message) => println!("{message}"),
        }
    }
}

enum Selection {
    Quit,
    Chosen(PathBuf),
    Retry(String),
}

fn parse_selection(input: &str, files: &[PathBuf]) -> Selection {
    if input.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }

    if let Ok(choice) = input.parse::<usize>() {
        return if (1..=files.len()).contains(&choice) {
            Selection::Chosen(files[choice - 1].clone())
        } else {
            Selection::Retry(format!(
                "Invalid choice: {choice}. Enter a number between 1 and {}.",
                files.len()
            ))
        };
    }

    let candidate = PathBuf::from(input);
    match validate_csv_path(&candidate) {
        Ok(path) => Selection::Chosen(path),
        Err(err) => Selection::Retry(err.to_string()),
    }
}

/// Validate that the provided path points to an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if !is_csv(path) {
        return Err(AppError::input(format!(
            "Expected a .csv file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under the current directory, sorted by path.
pub fn discover_csv_files() -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![(PathBuf::from("."), 0usize)];

    while let Some((dir, depth)) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
                if depth < SEARCH_DEPTH && !SKIP_DIRS.contains(&name) {
                    stack.push((path, depth + 1));
                }
            } else if file_type.is_file() && is_csv(&path) {
                out.push(path);
            }
        }
    }

    out.sort_by_key(|p| pretty_path(p));
    out
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        == Some(true)
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
