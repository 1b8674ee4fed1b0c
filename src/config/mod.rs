//! Configuration loading for econwrite

mod error;
mod schema;

pub use error::ConfigError;
pub use schema::{
    AbstractConfig, Config, Heuristics, RuleSeverity, TitleConfig, DEFAULT_ABSTRACT_MAX_WORDS,
    DEFAULT_ABSTRACT_MIN_WORDS, DEFAULT_TITLE_MAX_WORDS, DEFAULT_TITLE_MIN_WORDS,
};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILENAME: &str = ".econwriterc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    let config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())?
        }
        None => Config::default(),
    };
    config.validate().context("Invalid config")?;
    Ok(config)
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if visited.contains(&canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }
    visited.insert(canonical);

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative to the referencing config) to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .econwriterc.json in directory and its parents
fn find_config_in_parents(mut dir: &Path) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

/// Build a GlobSet from ignore patterns for path matching
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
        builder.add(glob);
    }
    builder.build().map_err(|e| anyhow::anyhow!("{}", e))
}

/// Check if a path should be ignored based on config glob patterns
pub fn is_ignored(path: &Path, ignore_set: &GlobSet) -> bool {
    ignore_set.is_match(path)
}

/// Render the defaults as a config file for `econwrite init`
pub fn default_config_json(strict: bool) -> Result<String> {
    let config = Config {
        title: TitleConfig {
            min_words: Some(DEFAULT_TITLE_MIN_WORDS),
            max_words: Some(DEFAULT_TITLE_MAX_WORDS),
            causal_keywords: Some(Heuristics::default().causal_keywords),
        },
        abstract_text: AbstractConfig {
            min_words: Some(DEFAULT_ABSTRACT_MIN_WORDS),
            max_words: Some(DEFAULT_ABSTRACT_MAX_WORDS),
            finding_keywords: Some(Heuristics::default().finding_keywords),
            contribution_keywords: Some(Heuristics::default().contribution_keywords),
        },
        ignore: vec!["**/node_modules/**".to_string(), "**/target/**".to_string()],
        strict: Some(strict),
        ..Config::default()
    };
    let mut json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    json.push('\n');
    Ok(json)
}
