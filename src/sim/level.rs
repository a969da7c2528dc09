/// Level templates and the level pack loader.
///
/// ## Pack format (`.smp`, shiftmaze pack):
///   ```text
///   ## Pack Name
///   ## Author: name
///   ## Description: blah blah
///   ---
///   name: Level 1
///   ################
///   #P....#.......X#
///   ...
///   @ 10,2 hbbh
///   ---
///   name: Level 2
///   ...
///   ```
///
/// Levels are separated by a line containing only `---`.
/// Pack metadata lines start with `##` and come before the first `---`.
/// `;` starts a comment line.
///
/// ## Cell legend:
///   '#' = Wall               '.' or ' ' = Empty
///   'o' = Blue checkpoint    'X' = Red checkpoint (exit)
///   'P' = Spawn              '!' = Hazard
///   '$' = Loot               '?' = Secret
///
/// A row containing commas is read as legacy numeric codes
/// (`1,1,0,4,...`, see `Cell::from_legacy_code`).
///
/// ## Patterns:
///   `@ x,y code` gives the tile at (x, y) a movement pattern
///   (`h` up, `b` down, `g` left, `d` right, `-` hold).

use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::domain::grid::{Grid, MotionState};
use crate::domain::pattern::MovementPattern;
use crate::domain::tile::Cell;
use crate::error::SimError;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Pattern { line: usize, source: SimError },

    #[error("level {name:?}: {source}")]
    Level { name: String, source: SimError },

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("could not read {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
}

/// Info about a level pack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackInfo {
    pub name: String,
    pub author: String,
    pub description: String,
    pub level_count: usize,
}

/// Immutable level data the live state is copied from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelTemplate {
    pub name: String,
    pub motion: MotionState,
    /// First `ActiveCheckpoint` cell in row-major order.
    pub spawn: (usize, usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSet {
    levels: Vec<LevelTemplate>,
}

impl LevelSet {
    /// Validate and index templates. Every level needs a spawn cell.
    pub fn new(levels: Vec<(String, MotionState)>) -> Result<Self, SimError> {
        if levels.is_empty() {
            return Err(SimError::EmptyLevelSet);
        }
        let levels = levels.into_iter()
            .enumerate()
            .map(|(index, (name, motion))| {
                let spawn = motion.grid()
                    .find_all(Cell::ActiveCheckpoint)
                    .next()
                    .ok_or(SimError::MissingSpawn { level: index })?;
                Ok(LevelTemplate { name, motion, spawn })
            })
            .collect::<Result<Vec<_>, SimError>>()?;
        Ok(LevelSet { levels })
    }

    pub fn get(&self, index: usize) -> Result<&LevelTemplate, SimError> {
        self.levels.get(index).ok_or(SimError::MissingLevel { index, count: self.levels.len() })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.name.as_str())
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load a pack file from disk.
pub fn load_pack(path: &Path) -> Result<(PackInfo, LevelSet), LevelError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| LevelError::Io { path: path.to_path_buf(), source })?;
    let (mut info, levels) = parse_pack(&content)?;
    if info.name.is_empty() {
        info.name = path.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
    }
    debug!("loaded pack {:?} from {} ({} levels)", info.name, path.display(), levels.len());
    Ok((info, levels))
}

/// Parse pack text into metadata + validated levels.
pub fn parse_pack(content: &str) -> Result<(PackInfo, LevelSet), LevelError> {
    let mut info = PackInfo::default();
    let mut defs: Vec<LevelDef> = vec![];
    let mut current: Option<LevelDef> = None;

    for (n, line) in content.lines().enumerate() {
        let line_no = n + 1;
        let trimmed = line.trim_end();

        if trimmed.trim() == "---" {
            if let Some(def) = current.take() {
                if !def.is_blank() { defs.push(def); }
            }
            current = Some(LevelDef::new(line_no + 1));
            continue;
        }

        let def = match current.as_mut() {
            Some(d) => d,
            None => {
                parse_pack_meta(&mut info, trimmed);
                continue;
            }
        };

        if trimmed.starts_with(';') {
            continue;
        } else if let Some(name) = trimmed.strip_prefix("name:") {
            def.name = name.trim().to_string();
        } else if let Some(rest) = trimmed.strip_prefix("@ ") {
            def.patterns.push(parse_pattern_line(rest, line_no)?);
        } else if !trimmed.is_empty() {
            def.rows.push((line_no, trimmed.to_string()));
        }
    }

    if let Some(def) = current.take() {
        if !def.is_blank() { defs.push(def); }
    }

    let levels = defs.into_iter()
        .enumerate()
        .map(|(i, def)| def.build(i))
        .collect::<Result<Vec<_>, _>>()?;
    info.level_count = levels.len();
    Ok((info, LevelSet::new(levels)?))
}

/// Levels shipped with the game, used when no pack is configured.
pub fn embedded_levels() -> Result<(PackInfo, LevelSet), LevelError> {
    parse_pack(EMBEDDED_PACK)
}

// ══════════════════════════════════════════════════════════════
// Internal: per-level parsing
// ══════════════════════════════════════════════════════════════

struct LevelDef {
    start_line: usize,
    name: String,
    rows: Vec<(usize, String)>,
    patterns: Vec<(usize, usize, usize, MovementPattern)>, // line, x, y, pattern
}

impl LevelDef {
    fn new(start_line: usize) -> Self {
        LevelDef { start_line, name: String::new(), rows: vec![], patterns: vec![] }
    }

    fn is_blank(&self) -> bool {
        self.rows.is_empty() && self.patterns.is_empty() && self.name.is_empty()
    }

    fn build(self, index: usize) -> Result<(String, MotionState), LevelError> {
        let name = if self.name.is_empty() {
            format!("Level {}", index + 1)
        } else {
            self.name
        };
        if self.rows.is_empty() {
            return Err(LevelError::Syntax {
                line: self.start_line,
                message: format!("level {name:?} has no map rows"),
            });
        }

        let decoded = self.rows.iter()
            .map(|(line, row)| parse_row(row, *line))
            .collect::<Result<Vec<_>, _>>()?;

        let height = decoded.len();
        let width = decoded.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for row in decoded {
            let pad = width - row.len();
            cells.extend(row);
            cells.extend(std::iter::repeat(Cell::Empty).take(pad));
        }
        let grid = Grid::from_cells(width, height, cells)
            .map_err(|source| LevelError::Level { name: name.clone(), source })?;

        let mut motion = MotionState::still(grid);
        for (line, x, y, pattern) in self.patterns {
            if x >= width || y >= height {
                return Err(LevelError::Syntax {
                    line,
                    message: format!("pattern cell ({x}, {y}) is outside the {width}x{height} map"),
                });
            }
            motion = motion.with_pattern(x, y, pattern);
        }

        Ok((name, motion))
    }
}

fn parse_pack_meta(info: &mut PackInfo, line: &str) {
    let trimmed = line.trim();
    if let Some(author) = trimmed.strip_prefix("## Author:") {
        info.author = author.trim().to_string();
    } else if let Some(desc) = trimmed.strip_prefix("## Description:") {
        info.description = desc.trim().to_string();
    } else if let Some(name) = trimmed.strip_prefix("##") {
        if info.name.is_empty() {
            info.name = name.trim().to_string();
        }
    }
}

/// `x,y code` → (line, x, y, pattern).
fn parse_pattern_line(rest: &str, line: usize) -> Result<(usize, usize, usize, MovementPattern), LevelError> {
    let syntax = |message: String| LevelError::Syntax { line, message };

    let mut parts = rest.split_whitespace();
    let coords = parts.next().ok_or_else(|| syntax("missing pattern cell".into()))?;
    let code = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(syntax("unexpected text after pattern".into()));
    }

    let (xs, ys) = coords.split_once(',')
        .ok_or_else(|| syntax(format!("expected x,y but found {coords:?}")))?;
    let x = xs.trim().parse::<usize>().map_err(|e| syntax(format!("bad x {xs:?}: {e}")))?;
    let y = ys.trim().parse::<usize>().map_err(|e| syntax(format!("bad y {ys:?}: {e}")))?;

    let pattern = MovementPattern::parse(code)
        .map_err(|source| LevelError::Pattern { line, source })?;
    Ok((line, x, y, pattern))
}

fn parse_row(row: &str, line: usize) -> Result<Vec<Cell>, LevelError> {
    if row.contains(',') {
        return row.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<u8>().ok()
                    .and_then(Cell::from_legacy_code)
                    .ok_or_else(|| LevelError::Syntax {
                        line,
                        message: format!("unknown cell code {s:?}"),
                    })
            })
            .collect();
    }
    row.chars()
        .map(|ch| Cell::from_char(ch).ok_or_else(|| LevelError::Syntax {
            line,
            message: format!("unknown cell {ch:?}"),
        }))
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Embedded fallback levels
// ══════════════════════════════════════════════════════════════

const EMBEDDED_PACK: &str = "\
## Built-in Levels
## Author: shiftmaze
## Description: Two short labyrinths included with the game
---
name: Level 1 - First Steps
################
#P....#.......X#
#.....#...#....#
#..............#
#.....#...o....#
#.....#........#
################
@ 10,2 hbbh
---
name: Level 2 - Conveyor
################
#P.....!......o#
#.##########...#
#..$..#........#
#..........#.?.#
#.............X#
################
@ 6,3 dddddggggg
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_pack_parses() {
        let (info, levels) = embedded_levels().unwrap();
        assert_eq!(info.name, "Built-in Levels");
        assert_eq!(info.author, "shiftmaze");
        assert_eq!(info.level_count, 2);
        assert_eq!(levels.len(), 2);

        let first = levels.get(0).unwrap();
        assert_eq!(first.name, "Level 1 - First Steps");
        assert_eq!(first.spawn, (1, 1));
        assert_eq!(first.motion.grid().width(), 16);
        assert_eq!(first.motion.grid().height(), 7);
        assert_eq!(first.motion.pattern_at(10, 2).unwrap().to_string(), "hbbh");
        assert_eq!(first.motion.grid().cell_at(10, 2), Cell::Wall);
    }

    #[test]
    fn embedded_patterns_are_closed_loops() {
        let (_, levels) = embedded_levels().unwrap();
        for i in 0..levels.len() {
            let level = levels.get(i).unwrap();
            for p in level.motion.patterns() {
                assert_eq!(p.net_delta(), (0, 0), "{}", level.name);
            }
        }
    }

    #[test]
    fn missing_level_is_a_configuration_error() {
        let (_, levels) = embedded_levels().unwrap();
        assert_eq!(levels.get(2), Err(SimError::MissingLevel { index: 2, count: 2 }));
    }

    #[test]
    fn short_rows_are_padded() {
        let (_, levels) = parse_pack("---\n####\n#P\n####\n").unwrap();
        let grid = levels.get(0).unwrap().motion.grid();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.cell_at(3, 1), Cell::Empty);
    }

    #[test]
    fn unnamed_levels_get_numbered() {
        let (_, levels) = parse_pack("---\nP.\n---\n.P\n").unwrap();
        assert_eq!(levels.names().collect::<Vec<_>>(), vec!["Level 1", "Level 2"]);
        assert_eq!(levels.get(1).unwrap().spawn, (1, 0));
    }

    #[test]
    fn legacy_numeric_rows() {
        let (_, levels) = parse_pack("---\n1,1,1\n1,4,3\n1,1,1\n").unwrap();
        let grid = levels.get(0).unwrap().motion.grid();
        assert_eq!(grid.cell_at(1, 1), Cell::ActiveCheckpoint);
        assert_eq!(grid.cell_at(2, 1), Cell::CheckpointRed);
        assert!(matches!(
            parse_pack("---\n1,99\n"),
            Err(LevelError::Syntax { line: 2, .. }),
        ));
    }

    #[test]
    fn level_without_spawn_is_rejected() {
        let err = parse_pack("---\nP.\n---\n..\n").unwrap_err();
        assert!(matches!(err, LevelError::Sim(SimError::MissingSpawn { level: 1 })));
    }

    #[test]
    fn empty_pack_is_rejected() {
        assert!(matches!(parse_pack("## Nothing\n"), Err(LevelError::Sim(SimError::EmptyLevelSet))));
    }

    #[test]
    fn bad_pattern_lines_report_their_line() {
        let err = parse_pack("---\nP.#\n@ 2,0 dz\n").unwrap_err();
        assert!(matches!(
            err,
            LevelError::Pattern { line: 3, source: SimError::InvalidStep { code: 'z', offset: 1 } },
        ));
        let err = parse_pack("---\nP.#\n@ 9,0 d\n").unwrap_err();
        assert!(matches!(err, LevelError::Syntax { line: 3, .. }));
        let err = parse_pack("---\nP.#\n@ two,0 d\n").unwrap_err();
        assert!(matches!(err, LevelError::Syntax { line: 3, .. }));
    }

    #[test]
    fn unknown_cell_is_rejected() {
        let err = parse_pack("---\nP.Z\n").unwrap_err();
        assert!(matches!(err, LevelError::Syntax { line: 2, .. }));
    }

    #[test]
    fn comments_are_skipped() {
        let (_, levels) = parse_pack("---\n; a note\nname: Tiny\nP\n").unwrap();
        assert_eq!(levels.get(0).unwrap().name, "Tiny");
        assert_eq!(levels.get(0).unwrap().motion.grid().height(), 1);
    }
}
