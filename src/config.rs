use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;
use tracing::debug;

/// Default wall-clock budget for a CLI run.
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

/// Execution limits read from `bf.toml` (or the file named by `BF_CONFIG`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_steps: Option<u64>,
    pub timeout_ms: Option<u64>,
}

static LIMITS: OnceLock<Limits> = OnceLock::new();

/// Limits from the user's config file, loaded once.
pub fn limits() -> &'static Limits {
    LIMITS.get_or_init(|| load_from_toml().unwrap_or_default())
}

/// Resolve limits: flags -> env -> config file -> defaults.
pub fn resolve(flag_timeout_ms: Option<u64>, flag_max_steps: Option<u64>) -> (u64, Option<u64>) {
    let file = limits();
    let timeout_ms = flag_timeout_ms
        .or_else(|| env_u64("BF_TIMEOUT_MS"))
        .or(file.timeout_ms)
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    let max_steps = flag_max_steps
        .or_else(|| env_u64("BF_MAX_STEPS"))
        .or(file.max_steps);
    (timeout_ms, max_steps)
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(path));
    }
    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<Limits> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!(path = %path.display(), "loaded config");
    Some(parse_limits(&content))
}

/// Small line parser: picks `key = value` pairs out of the `[limits]` section.
/// Unknown keys and unparsable values are ignored.
pub fn parse_limits(content: &str) -> Limits {
    let mut in_limits = false;
    let mut limits = Limits::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            in_limits = line[1..line.len() - 1].trim() == "limits";
            continue;
        }
        if !in_limits { continue; }
        let Some((key, raw)) = line.split_once('=') else { continue; };
        // Accept quoted or unquoted, and drop trailing comments
        let raw = raw.split('#').next().unwrap_or_default().trim().trim_matches('"');
        let Ok(value) = raw.replace('_', "").parse::<u64>() else { continue; };
        match key.trim() {
            "max_steps" => limits.max_steps = Some(value),
            "timeout_ms" => limits.timeout_ms = Some(value),
            _ => {}
        }
    }
    limits
}
