use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub library: Library,
    #[serde(default)]
    pub player: Player,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.to_string_lossy()))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }

    /// Loads the config file if one was given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Config::default()),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Database {
    #[serde(default)]
    pub in_memory: bool,
    /// Database file path. When absent, a per-user default under the home
    /// directory is used (see storage::db).
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct Library {
    /// Root of the music tree to scan.
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for Library {
    fn default() -> Self {
        Self {
            root: None,
            follow_symlinks: false,
        }
    }
}

impl Library {
    /// Effective scan root: configured value, else `~/Music`.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        self.root
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join("Music")))
    }
}

#[derive(Debug, Deserialize)]
pub struct Player {
    /// External player binary driven by the playback session.
    pub binary: String,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_config_toml() -> anyhow::Result<()> {
        let toml_str = r#"
[database]
in_memory = true

[library]
root = "/home/user/Music"
follow_symlinks = true

[player]
binary = "mpv"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert!(cfg.database.in_memory);
        assert_eq!(cfg.library.root, Some(PathBuf::from("/home/user/Music")));
        assert!(cfg.library.follow_symlinks);
        assert_eq!(cfg.player.binary, "mpv");

        Ok(())
    }

    #[test]
    fn test_parse_file_database_config() -> anyhow::Result<()> {
        let toml_str = r#"
[database]
in_memory = false
path = "/tmp/mtsp.db"
"#;

        let cfg: Config = toml::from_str(toml_str)?;

        assert!(!cfg.database.in_memory);
        assert_eq!(cfg.database.path, Some(PathBuf::from("/tmp/mtsp.db")));

        // Sections not present in the file fall back to defaults.
        assert_eq!(cfg.library.root, None);
        assert!(!cfg.library.follow_symlinks);
        assert_eq!(cfg.player.binary, "mpv");

        Ok(())
    }

    #[test]
    fn test_empty_config_is_all_defaults() -> anyhow::Result<()> {
        let cfg: Config = toml::from_str("")?;

        assert!(!cfg.database.in_memory);
        assert_eq!(cfg.database.path, None);
        assert_eq!(cfg.player.binary, "mpv");

        Ok(())
    }
}
