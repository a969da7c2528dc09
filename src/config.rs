/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::{debug, warn};
use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Structs ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: SimRules,
    pub host: HostConfig,
}

/// When the tile-motion engine runs.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionClock {
    /// Tiles advance on every non-transition tick.
    EveryTick,
    /// Tiles advance only when the player makes an accepted move
    /// (turn-based labyrinth).
    PlayerMoves,
}

/// Rules consumed by the simulation core.
#[derive(Clone, Debug, PartialEq)]
pub struct SimRules {
    pub error_display_ms: u32,  // how long a blocked-move marker stays up
    pub shuffle_quantum_ms: u32, // simulated time per shuffle swap
    pub shuffle_swaps: u32,     // transition ends once this many swaps are exceeded
    pub loot_value: u32,
    pub motion_clock: MotionClock,
    pub seed: u64,
}

/// Settings for the driving loop; the core never reads these.
#[derive(Clone, Debug)]
pub struct HostConfig {
    pub tick_rate_ms: u32,
    pub seed: Option<u64>,
    pub pack: Option<PathBuf>,
}

impl Default for SimRules {
    fn default() -> Self {
        SimRules {
            error_display_ms: default_error_display(),
            shuffle_quantum_ms: default_shuffle_quantum(),
            shuffle_swaps: default_shuffle_swaps(),
            loot_value: default_loot_value(),
            motion_clock: default_motion_clock(),
            seed: 0,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    host: TomlHost,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_error_display")]
    error_display_ms: u32,
    #[serde(default = "default_shuffle_quantum")]
    shuffle_quantum_ms: u32,
    #[serde(default = "default_shuffle_swaps")]
    shuffle_swaps: u32,
    #[serde(default = "default_loot_value")]
    loot_value: u32,
    #[serde(default = "default_motion_clock")]
    motion_clock: MotionClock,
}

#[derive(Deserialize, Debug)]
struct TomlHost {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u32,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    pack: Option<String>,
}

// ── Defaults ──

fn default_error_display() -> u32 { 400 }
fn default_shuffle_quantum() -> u32 { 5 }
fn default_shuffle_swaps() -> u32 { 600 }
fn default_loot_value() -> u32 { 10 }
fn default_motion_clock() -> MotionClock { MotionClock::EveryTick }
fn default_tick_rate() -> u32 { 33 }     // ~30 ticks per second

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            error_display_ms: default_error_display(),
            shuffle_quantum_ms: default_shuffle_quantum(),
            shuffle_swaps: default_shuffle_swaps(),
            loot_value: default_loot_value(),
            motion_clock: default_motion_clock(),
        }
    }
}

impl Default for TomlHost {
    fn default() -> Self {
        TomlHost {
            tick_rate_ms: default_tick_rate(),
            seed: None,
            pack: None,
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        GameConfig::from_toml(toml_cfg, &search_dirs)
    }

    /// Parse config text directly (no file search).
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(GameConfig::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        // Relative pack paths resolve against the first search dir that has them.
        let pack = toml_cfg.host.pack.map(|p| {
            let path = PathBuf::from(&p);
            if path.is_absolute() {
                return path;
            }
            search_dirs.iter()
                .map(|d| d.join(&p))
                .find(|candidate| candidate.is_file())
                .unwrap_or(path)
        });

        GameConfig {
            rules: SimRules {
                error_display_ms: toml_cfg.rules.error_display_ms,
                shuffle_quantum_ms: toml_cfg.rules.shuffle_quantum_ms.max(1),
                shuffle_swaps: toml_cfg.rules.shuffle_swaps,
                loot_value: toml_cfg.rules.loot_value,
                motion_clock: toml_cfg.rules.motion_clock,
                seed: toml_cfg.host.seed.unwrap_or(0),
            },
            host: HostConfig {
                tick_rate_ms: toml_cfg.host.tick_rate_ms.max(1),
                seed: toml_cfg.host.seed,
                pack,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), &[])
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        debug!("loaded {}", path.display());
                        return cfg;
                    }
                    Err(e) => {
                        warn!("config.toml parse error: {e}; using default settings");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
