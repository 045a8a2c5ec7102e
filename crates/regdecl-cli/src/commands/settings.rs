//! Configuration loading shared by the commands.
//!
//! Values are layered: configuration file, then `REGDECL_*` environment
//! variables, then command-line flags. Clap resolves the last two.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use regdecl_core::tags::TagKey;
use regdecl_core::RegistryConfig;
use regdecl_render::CheckerConfig;

/// Configuration source and overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (YAML, or JSON with a `.json` extension)
    #[arg(short, long, env = "REGDECL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Registry name
    #[arg(short = 'n', long, env = "REGDECL_REPOSITORY_NAME")]
    pub repository_name: Option<String>,

    /// Scan images on push (true/false)
    #[arg(long, env = "REGDECL_ENABLE_IMAGE_SCANNING")]
    pub enable_image_scanning: Option<bool>,

    /// Request KMS encryption (true/false)
    #[arg(long, env = "REGDECL_ENABLE_KMS_ENCRYPTION")]
    pub enable_kms_encryption: Option<bool>,

    /// KMS key ARN, id or alias
    #[arg(long, env = "REGDECL_KMS_KEY")]
    pub kms_key: Option<String>,

    /// `Company` tag
    #[arg(long, env = "REGDECL_COMPANY")]
    pub company: Option<String>,

    /// `App` tag
    #[arg(long, env = "REGDECL_APP")]
    pub app: Option<String>,

    /// `Env` tag
    #[arg(long, env = "REGDECL_ENV")]
    pub env: Option<String>,

    /// `Owner` tag
    #[arg(long, env = "REGDECL_OWNER")]
    pub owner: Option<String>,

    /// `CostCenter` tag
    #[arg(long, env = "REGDECL_COSTCENTER")]
    pub costcenter: Option<String>,

    /// Leave the registry naming rules to the engine
    #[arg(long)]
    pub no_strict_names: bool,
}

impl ConfigArgs {
    /// Loads the file, if any, and applies the overrides.
    pub fn load(&self) -> Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => load_file(path)?,
            None => RegistryConfig::new(""),
        };

        if let Some(name) = &self.repository_name {
            config.repository_name.clone_from(name);
        }
        if let Some(enabled) = self.enable_image_scanning {
            config.enable_image_scanning = enabled;
        }
        if let Some(enabled) = self.enable_kms_encryption {
            config.enable_kms_encryption = enabled;
        }
        if let Some(key) = &self.kms_key {
            config.kms_key.clone_from(key);
        }

        let tags = [
            (TagKey::Company, &self.company),
            (TagKey::App, &self.app),
            (TagKey::Env, &self.env),
            (TagKey::Owner, &self.owner),
            (TagKey::CostCenter, &self.costcenter),
        ];
        for (key, value) in tags {
            if let Some(value) = value {
                config = config.with_tag(key, value.clone());
            }
        }

        debug!(repository = %config.repository_name, "Loaded configuration");
        Ok(config)
    }

    /// Returns the checker configuration implied by the flags.
    pub fn checker_config(&self, strict: bool) -> CheckerConfig {
        let base = if strict {
            CheckerConfig::strict()
        } else {
            CheckerConfig::default()
        };
        base.with_strict_names(!self.no_strict_names)
    }
}

/// Reads a configuration file, choosing the format by extension.
pub fn load_file(path: &Path) -> Result<RegistryConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "registry.yaml",
            "repository_name: my-repo\nenable_kms_encryption: true\nkms_key: alias/ecr\nowner: team@example.com\n",
        );

        let config = load_file(&path).unwrap();
        assert_eq!(config.repository_name, "my-repo");
        assert!(config.enable_kms_encryption);
        assert_eq!(config.owner.as_deref(), Some("team@example.com"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "registry.JSON",
            r#"{"repository_name": "my-repo", "enable_image_scanning": false}"#,
        );

        let config = load_file(&path).unwrap();
        assert!(!config.enable_image_scanning);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "registry.yml", "repository_name: my-repo\nscan: true\n");
        let err = load_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("scan"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file(Path::new("/nonexistent/registry.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "registry.yaml",
            "repository_name: from-file\ncompany: FileCo\napp: FileApp\n",
        );

        let args = ConfigArgs {
            config: Some(path),
            repository_name: Some("from-flag".to_string()),
            enable_image_scanning: Some(false),
            company: Some("FlagCo".to_string()),
            ..Default::default()
        };
        let config = args.load().unwrap();

        assert_eq!(config.repository_name, "from-flag");
        assert!(!config.enable_image_scanning);
        assert_eq!(config.company.as_deref(), Some("FlagCo"));
        assert_eq!(config.app.as_deref(), Some("FileApp"));
    }

    #[test]
    fn test_no_file_starts_from_defaults() {
        let args = ConfigArgs {
            repository_name: Some("my-repo".to_string()),
            ..Default::default()
        };
        assert_eq!(args.load().unwrap(), RegistryConfig::new("my-repo"));
    }

    #[test]
    fn test_checker_config() {
        let args = ConfigArgs {
            no_strict_names: true,
            ..Default::default()
        };
        let config = args.checker_config(true);
        assert!(config.fail_on_warnings);
        assert!(!config.strict_names);
        assert!(ConfigArgs::default().checker_config(false).strict_names);
    }
}
