//! Map file parsing (C1's external collaborator).
//!
//! Mirrors `FileLoader::loadBoardFile`/`parseKeyValue`: five fixed header
//! lines, `key = value` with trimmed whitespace and a non-negative decimal
//! value, board rows padded/truncated to the declared size.

use std::fs;
use std::path::Path;

use crate::board::{Board, TankSpawn};
use crate::errors::MapError;

/// A fully parsed map: the board, the tank spawns found while parsing it,
/// the header-declared step/shell limits, and any non-fatal warnings.
pub struct BoardInfo {
    pub name: String,
    pub board: Board,
    pub spawns: Vec<TankSpawn>,
    pub max_steps: u32,
    pub num_shells: u32,
    pub warnings: Vec<String>,
}

impl BoardInfo {
    /// An independent, owned copy, for handing to a worker-pool task that
    /// needs `'static` data (see `Board::deep_clone`).
    pub fn deep_clone(&self) -> BoardInfo {
        BoardInfo {
            name: self.name.clone(),
            board: self.board.deep_clone(),
            spawns: self.spawns.clone(),
            max_steps: self.max_steps,
            num_shells: self.num_shells,
            warnings: self.warnings.clone(),
        }
    }
}

pub fn load_board_file(path: &Path) -> Result<BoardInfo, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    })?;

    let lines: Vec<&str> = text.lines().collect();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    if lines.len() < 5 {
        return Err(MapError::TruncatedHeader { name: file_name });
    }

    let name = lines[0].to_string();
    let max_steps = parse_key_value(lines[1], "MaxSteps", &name, 1)?;
    let num_shells = parse_key_value(lines[2], "NumShells", &name, 2)?;
    let rows = parse_key_value(lines[3], "Rows", &name, 3)?;
    let cols = parse_key_value(lines[4], "Cols", &name, 4)?;

    if rows == 0 || cols == 0 {
        return Err(MapError::NonPositiveDimension { name });
    }

    let body: Vec<String> = lines[5..].iter().map(|s| s.to_string()).collect();
    let (board, spawns, warnings) = Board::from_char_grid(cols as i32, rows as i32, &body);

    if spawns.is_empty() {
        return Err(MapError::NoTanks { name });
    }

    Ok(BoardInfo {
        name,
        board,
        spawns,
        max_steps,
        num_shells,
        warnings,
    })
}

/// Parse a `key = value` header line, requiring an exact key match and a
/// non-negative decimal value. `line_number` is 1-indexed for diagnostics.
fn parse_key_value(line: &str, key: &str, map_name: &str, line_number: usize) -> Result<u32, MapError> {
    let malformed = || MapError::MalformedHeaderLine {
        name: map_name.to_string(),
        line: line_number,
        text: line.to_string(),
    };

    let (left, right) = line.split_once('=').ok_or_else(malformed)?;
    let left = left.trim();
    let right = right.trim();
    if left != key {
        return Err(malformed());
    }

    right.parse::<i64>().ok().filter(|v| *v >= 0).map(|v| v as u32).ok_or_else(|| MapError::InvalidHeaderValue {
        name: map_name.to_string(),
        key: key.to_string(),
        value: right.to_string(),
    })
}

/// Enumerate `.txt` map files under `dir`, sorted for deterministic order.
pub fn enumerate_map_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt") {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}
