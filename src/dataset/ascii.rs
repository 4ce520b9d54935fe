use std::fs;
use std::path::Path;

use super::XYDataset;
use crate::error::{PhzError, Result};

/// Parser for two-column ASCII dataset files.
///
/// ```text
/// # NAME: El_B2004a
/// # any other comment
/// 1000.0   0.0012
/// 1010.0   0.0013
/// ```
///
/// Lines starting with `#` are comments; `# KEY: value` lines are parameters.
/// Every other non-empty line must hold exactly two numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiParser;

impl AsciiParser {
    /// Dataset name: the `NAME` parameter, else a bare `# name` first line,
    /// else the file name without directories and extension.
    pub fn get_name(&self, file: &Path) -> Result<String> {
        let name = self.get_parameter(file, "NAME")?;
        if !name.is_empty() {
            return Ok(name);
        }

        let content = read(file)?;
        let first = content.lines().map(str::trim).find(|l| !l.is_empty());
        if let Some(bare) = first.and_then(bare_name) {
            return Ok(bare.to_string());
        }

        Ok(file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    /// Values of every `# KEY: value` line, joined with `;`.
    pub fn get_parameter(&self, file: &Path, keyword: &str) -> Result<String> {
        let content = read(file)?;
        let values: Vec<&str> = content
            .lines()
            .filter_map(|line| parameter_value(line, keyword))
            .collect();
        Ok(values.join(";"))
    }

    pub fn get_dataset(&self, file: &Path) -> Result<XYDataset> {
        let content = read(file)?;
        let mut pairs = Vec::new();
        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let pair = parse_row(line).map_err(|message| {
                PhzError::parse(format!("{}:{}: {message}", file.display(), number + 1))
            })?;
            pairs.push(pair);
        }
        XYDataset::from_pairs(pairs)
    }

    /// The first data line holds two numbers and nothing else.
    pub fn is_dataset_file(&self, file: &Path) -> bool {
        let Ok(content) = fs::read_to_string(file) else {
            return false;
        };
        content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty() && !l.starts_with('#'))
            .is_some_and(|line| parse_row(line).is_ok())
    }
}

fn read(file: &Path) -> Result<String> {
    fs::read_to_string(file).map_err(|e| PhzError::io(file, e))
}

fn parse_row(line: &str) -> std::result::Result<(f64, f64), String> {
    let mut cells = line.split_whitespace();
    let (Some(x), Some(y)) = (cells.next(), cells.next()) else {
        return Err(format!("expected two columns in '{line}'"));
    };
    if let Some(extra) = cells.next() {
        return Err(format!("unexpected extra cell '{extra}'"));
    }
    let parse = |cell: &str| {
        cell.parse::<f64>()
            .map_err(|_| format!("cell '{cell}' is not a number"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn parameter_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.trim().strip_prefix('#')?.trim_start();
    let rest = rest.strip_prefix(keyword)?.trim_start();
    let value = rest.strip_prefix(':')?.trim();
    (!value.is_empty()).then_some(value)
}

/// `# name` with a single word of word characters.
fn bare_name(line: &str) -> Option<&str> {
    let word = line.strip_prefix('#')?.trim();
    (!word.is_empty() && word.chars().all(|c| c.is_alphanumeric() || c == '_')).then_some(word)
}
