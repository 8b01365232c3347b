//! Configuration file management for stratplan.
//!
//! Provides a TOML-based config file at `~/.config/stratplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use stratplan_core::IdSeed;

/// Env var overriding the documents directory.
pub const DOCUMENTS_DIR_ENV: &str = "STRATPLAN_DOCUMENTS_DIR";
/// Env var overriding the identity seed strategy.
pub const ID_SEED_ENV: &str = "STRATPLAN_ID_SEED";

// -----------------------------------------------------------------------
// Seed strategy
// -----------------------------------------------------------------------

/// How the per-pass identity seed is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedStrategy {
    /// Milliseconds since the epoch at the time of the pass.
    #[default]
    Clock,
    Random,
    /// A fixed value, for reproducible ids.
    Fixed(u64),
}

impl SeedStrategy {
    pub fn seed(self) -> IdSeed {
        match self {
            Self::Clock => IdSeed::from_clock(),
            Self::Random => IdSeed::random(),
            Self::Fixed(n) => IdSeed::new(n),
        }
    }
}

impl fmt::Display for SeedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock => f.write_str("clock"),
            Self::Random => f.write_str("random"),
            Self::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for SeedStrategy {
    type Err = SeedStrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clock" => Ok(Self::Clock),
            "random" => Ok(Self::Random),
            other => other
                .parse::<u64>()
                .map(Self::Fixed)
                .map_err(|_| SeedStrategyParseError(s.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`SeedStrategy`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid seed {0:?}: expected \"clock\", \"random\", or an integer")]
pub struct SeedStrategyParseError(pub String);

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub identity: IdentitySection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Where document snapshots live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentitySection {
    /// `"clock"`, `"random"`, or an integer.
    pub seed: String,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            seed: SeedStrategy::default().to_string(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the stratplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/stratplan` or
/// `~/.config/stratplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("stratplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("stratplan")
}

/// Return the path to the stratplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default documents directory: `$XDG_DATA_HOME/stratplan/documents` or the
/// platform data dir.
pub fn default_documents_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("stratplan").join("documents");
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stratplan")
        .join("documents")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct StratplanConfig {
    pub documents_dir: PathBuf,
    pub seed: SeedStrategy,
}

impl StratplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Documents dir: `cli_documents_dir` > `STRATPLAN_DOCUMENTS_DIR` >
    ///   `storage.documents_dir` > [`default_documents_dir`]
    /// - Seed: `cli_seed` > `STRATPLAN_ID_SEED` > `identity.seed` > clock
    ///
    /// A missing config file is fine; an unreadable or invalid one is not.
    pub fn resolve(cli_documents_dir: Option<&Path>, cli_seed: Option<&str>) -> Result<Self> {
        let path = config_path();
        let file_config = if path.exists() {
            Some(load_config_from(&path)?)
        } else {
            None
        };

        let documents_dir = if let Some(dir) = cli_documents_dir {
            dir.to_path_buf()
        } else if let Ok(dir) = std::env::var(DOCUMENTS_DIR_ENV) {
            PathBuf::from(dir)
        } else if let Some(dir) = file_config
            .as_ref()
            .and_then(|cfg| cfg.storage.documents_dir.clone())
        {
            dir
        } else {
            default_documents_dir()
        };

        let seed = if let Some(seed) = cli_seed {
            seed.parse().context("invalid --seed")?
        } else if let Ok(seed) = std::env::var(ID_SEED_ENV) {
            seed.parse()
                .with_context(|| format!("{ID_SEED_ENV} env var is not a valid seed"))?
        } else if let Some(ref cfg) = file_config {
            cfg.identity
                .seed
                .parse()
                .context("invalid identity.seed in config file")?
        } else {
            SeedStrategy::default()
        };

        Ok(Self {
            documents_dir,
            seed,
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point the config dir at a fresh temp dir and clear overrides.
    fn isolated() -> tempfile::TempDir {
        let tmp = tempfile::TempDir::new().unwrap();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        unsafe { std::env::remove_var(DOCUMENTS_DIR_ENV) };
        unsafe { std::env::remove_var(ID_SEED_ENV) };
        tmp
    }

    #[test]
    fn seed_strategy_parses_all_forms() {
        assert_eq!("clock".parse::<SeedStrategy>().unwrap(), SeedStrategy::Clock);
        assert_eq!(" Random ".parse::<SeedStrategy>().unwrap(), SeedStrategy::Random);
        assert_eq!("42".parse::<SeedStrategy>().unwrap(), SeedStrategy::Fixed(42));
        assert!("sometimes".parse::<SeedStrategy>().is_err());
        assert!("-1".parse::<SeedStrategy>().is_err());
    }

    #[test]
    fn seed_strategy_roundtrips_through_display() {
        for s in [SeedStrategy::Clock, SeedStrategy::Random, SeedStrategy::Fixed(7)] {
            assert_eq!(s.to_string().parse::<SeedStrategy>().unwrap(), s);
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        assert_eq!(SeedStrategy::Fixed(9).seed(), IdSeed::new(9));
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let _lock = lock_env();
        let _tmp = isolated();

        let original = ConfigFile {
            storage: StorageSection {
                documents_dir: Some(PathBuf::from("/srv/plans")),
            },
            identity: IdentitySection {
                seed: "random".to_string(),
            },
        };
        save_config(&original).unwrap();

        let loaded = load_config().unwrap();
        assert_eq!(loaded.storage.documents_dir, original.storage.documents_dir);
        assert_eq!(loaded.identity.seed, "random");
    }

    #[test]
    fn empty_config_file_uses_section_defaults() {
        let _lock = lock_env();
        let _tmp = isolated();
        std::fs::create_dir_all(config_dir()).unwrap();
        std::fs::write(config_path(), "").unwrap();

        let loaded = load_config().unwrap();
        assert!(loaded.storage.documents_dir.is_none());
        assert_eq!(loaded.identity.seed, "clock");
    }

    #[test]
    fn resolve_with_cli_flags_overrides_all() {
        let _lock = lock_env();
        let _tmp = isolated();
        unsafe { std::env::set_var(DOCUMENTS_DIR_ENV, "/env/docs") };
        unsafe { std::env::set_var(ID_SEED_ENV, "random") };

        let config = StratplanConfig::resolve(Some(Path::new("/cli/docs")), Some("5")).unwrap();
        assert_eq!(config.documents_dir, PathBuf::from("/cli/docs"));
        assert_eq!(config.seed, SeedStrategy::Fixed(5));

        unsafe { std::env::remove_var(DOCUMENTS_DIR_ENV) };
        unsafe { std::env::remove_var(ID_SEED_ENV) };
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let _tmp = isolated();
        save_config(&ConfigFile {
            storage: StorageSection {
                documents_dir: Some(PathBuf::from("/file/docs")),
            },
            identity: IdentitySection {
                seed: "11".to_string(),
            },
        })
        .unwrap();
        unsafe { std::env::set_var(DOCUMENTS_DIR_ENV, "/env/docs") };

        let config = StratplanConfig::resolve(None, None).unwrap();
        assert_eq!(config.documents_dir, PathBuf::from("/env/docs"));
        assert_eq!(config.seed, SeedStrategy::Fixed(11));

        unsafe { std::env::remove_var(DOCUMENTS_DIR_ENV) };
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        let _tmp = isolated();

        let config = StratplanConfig::resolve(None, None).unwrap();
        assert_eq!(config.documents_dir, default_documents_dir());
        assert_eq!(config.seed, SeedStrategy::Clock);
    }

    #[test]
    fn resolve_rejects_invalid_env_seed() {
        let _lock = lock_env();
        let _tmp = isolated();
        unsafe { std::env::set_var(ID_SEED_ENV, "often") };

        let result = StratplanConfig::resolve(None, None);
        unsafe { std::env::remove_var(ID_SEED_ENV) };

        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains(ID_SEED_ENV), "unexpected error: {msg}");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let _lock = lock_env();
        let _tmp = isolated();
        assert!(config_path().ends_with("stratplan/config.toml"));
    }
}
