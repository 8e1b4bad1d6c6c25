use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use zengate_crypto::key;

/// User-level configuration loaded from `~/.config/zengate/config.toml`
/// (platform-specific). The encryption key lives here in plaintext; the
/// file is the operator's responsibility.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Tunnel endpoint handed to the container stack.
    pub tunnel_url: Option<String>,
    /// Backend API endpoint.
    pub api_url: Option<String>,
    /// Base64 vault key; must decode to exactly 32 bytes.
    pub encrypt_key: Option<String>,
    /// Override for the password store file.
    pub data_file: Option<PathBuf>,
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    let path = default_path()?;
    load_from_path(path)
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = toml::from_str(&contents)?;
    Ok(cfg)
}

/// Resolve the default config path (platform aware).
pub fn default_path() -> Result<PathBuf> {
    let base = config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("zengate").join("config.toml"))
}

/// Write the config to the default path, creating parents as needed.
pub fn save(config: &Config) -> Result<PathBuf> {
    let path = default_path()?;
    save_to_path(config, &path)?;
    Ok(path)
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = toml::to_string_pretty(config)?;
    fs::write(path, body)?;
    Ok(())
}

/// Write the given config to disk only if no file exists yet, to avoid
/// clobbering user edits.
pub fn write_default_if_missing(config: &Config) -> Result<PathBuf> {
    let path = default_path()?;
    if path.exists() {
        return Ok(path);
    }
    save_to_path(config, &path)?;
    Ok(path)
}

/// Apply a `set <key> <value>` update. `encrypt_key` must pass validation
/// before it is accepted; a rejected value leaves the config untouched.
pub fn set_value(config: &mut Config, key_name: &str, value: String) -> Result<()> {
    match key_name.to_ascii_lowercase().as_str() {
        "tunnel_url" | "tunnelurl" => config.tunnel_url = Some(value),
        "api_url" | "apiurl" => config.api_url = Some(value),
        "encrypt_key" | "encryptkey" => {
            key::validate(&value)
                .map_err(|err| color_eyre::eyre::eyre!("invalid encrypt_key: {err}"))?;
            config.encrypt_key = Some(value.trim().to_string());
        }
        other => color_eyre::eyre::bail!("unknown config key {other}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use zengate_crypto::key::EncryptionKey;

    use super::*;

    #[test]
    fn returns_default_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_from_path(dir.path().join("config.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn parses_custom_config() {
        let contents = r#"
            tunnel_url = "https://tunnel.example"
            api_url = "http://localhost:3002"
            encrypt_key = "c2VjcmV0"
            data_file = "/tmp/zengate-passwords.json"
        "#;
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).expect("write temp config");

        let cfg = load_from_path(&path).expect("load");
        assert_eq!(
            cfg,
            Config {
                tunnel_url: Some("https://tunnel.example".into()),
                api_url: Some("http://localhost:3002".into()),
                encrypt_key: Some("c2VjcmV0".into()),
                data_file: Some(PathBuf::from("/tmp/zengate-passwords.json")),
            }
        );
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            tunnel_url: Some("https://t.example".into()),
            ..Config::default()
        };

        save_to_path(&cfg, &path).expect("save");
        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn set_accepts_a_valid_encrypt_key() {
        let mut cfg = Config::default();
        let encoded = EncryptionKey::generate().to_base64();
        set_value(&mut cfg, "encrypt_key", encoded.clone()).expect("set");
        assert_eq!(cfg.encrypt_key, Some(encoded));
    }

    #[test]
    fn set_rejects_a_short_encrypt_key_and_leaves_config_untouched() {
        let mut cfg = Config::default();
        let err = set_value(&mut cfg, "encrypt_key", "c2VjcmV0".into()).expect_err("should fail");
        assert!(err.to_string().contains("invalid encrypt_key"));
        assert_eq!(cfg.encrypt_key, None);
    }

    #[test]
    fn set_accepts_alias_spellings() {
        let mut cfg = Config::default();
        set_value(&mut cfg, "tunnelurl", "https://t.example".into()).expect("set");
        assert_eq!(cfg.tunnel_url, Some("https://t.example".into()));
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut cfg = Config::default();
        let err = set_value(&mut cfg, "mystery", "v".into()).expect_err("should fail");
        assert!(err.to_string().contains("unknown config key"));
    }
}
