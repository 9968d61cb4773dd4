// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Gateway Configuration Types
//
// Defines the configuration schema for a devfs gateway, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Storage root and upload staging directory
// - Network binding and routing prefix
// - Observability settings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const API_VERSION: &str = "devfs.dev/v1";
pub const KIND: &str = "GatewayConfig";

/// Top-level Kubernetes-style gateway configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfigManifest {
    /// API version (must be "devfs.dev/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "GatewayConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: GatewayConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Human-readable gateway name
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfigSpec {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory outside of which no operation may act
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Where multipart uploads are staged before being committed
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path segment preceding the operation name, e.g. `/client-dev-interface/create`
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus exporter port; disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join("devfs-staging")
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_route_prefix() -> String {
    "client-dev-interface".to_string()
}

fn default_max_body_bytes() -> usize {
    100 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            staging_dir: default_staging_dir(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            route_prefix: default_route_prefix(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_port: None,
        }
    }
}

impl Default for GatewayConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "devfs-gateway".to_string(),
                labels: None,
            },
            spec: GatewayConfigSpec::default(),
        }
    }
}

impl GatewayConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. DEVFS_CONFIG_PATH environment variable
    /// 2. ./devfs-config.yaml (working directory)
    /// 3. ~/.devfs/config.yaml (user home)
    /// 4. /etc/devfs/config.yaml (system, Unix) or C:\ProgramData\Devfs\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("DEVFS_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./devfs-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".devfs").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        #[cfg(unix)]
        let system_config = PathBuf::from("/etc/devfs/config.yaml");
        #[cfg(windows)]
        let system_config = PathBuf::from("C:\\ProgramData\\Devfs\\config.yaml");

        if system_config.exists() {
            return Some(system_config);
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path: fail if missing/invalid
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::warn!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DEVFS_ROOT") {
            tracing::info!("Environment override: DEVFS_ROOT={}", val);
            self.spec.storage.root = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("DEVFS_STAGING_DIR") {
            tracing::info!("Environment override: DEVFS_STAGING_DIR={}", val);
            self.spec.storage.staging_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("DEVFS_PORT") {
            match val.parse::<u16>() {
                Ok(port) => {
                    tracing::info!("Environment override: DEVFS_PORT={}", port);
                    self.spec.network.port = port;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for DEVFS_PORT: '{}'. Expected a port number. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Make relative storage paths absolute against the working directory.
    /// Called once at startup so handlers only ever see absolute paths.
    pub fn resolve_paths(&mut self) -> anyhow::Result<()> {
        self.spec.storage.root = std::path::absolute(&self.spec.storage.root)?;
        self.spec.storage.staging_dir = std::path::absolute(&self.spec.storage.staging_dir)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let storage = &self.spec.storage;
        if !storage.root.is_absolute() {
            anyhow::bail!("spec.storage.root must be absolute: {:?}", storage.root);
        }
        if !storage.staging_dir.is_absolute() {
            anyhow::bail!(
                "spec.storage.staging_dir must be absolute: {:?}",
                storage.staging_dir
            );
        }

        let network = &self.spec.network;
        if network.route_prefix.is_empty() || network.route_prefix.contains('/') {
            anyhow::bail!(
                "spec.network.route_prefix must be a single non-empty path segment: '{}'",
                network.route_prefix
            );
        }
        if network.port == 0 {
            anyhow::bail!("spec.network.port cannot be 0");
        }
        if network.max_body_bytes == 0 {
            anyhow::bail!("spec.network.max_body_bytes cannot be 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = GatewayConfigManifest::default();
        assert_eq!(manifest.api_version, API_VERSION);
        assert_eq!(manifest.kind, KIND);
        assert_eq!(manifest.spec.network.route_prefix, "client-dev-interface");
        assert_eq!(manifest.spec.network.port, 8080);
        assert!(manifest.spec.observability.metrics_port.is_none());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let yaml = r#"
apiVersion: devfs.dev/v1
kind: GatewayConfig
metadata:
  name: local-dev
spec:
  storage:
    root: /srv/project
    staging_dir: /tmp/devfs-staging
  network:
    port: 9090
"#;
        let manifest = GatewayConfigManifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.metadata.name, "local-dev");
        assert_eq!(manifest.spec.storage.root, PathBuf::from("/srv/project"));
        assert_eq!(manifest.spec.network.port, 9090);
        assert_eq!(manifest.spec.network.bind_address, "127.0.0.1");
        assert_eq!(manifest.spec.observability.log_level, "info");
        manifest.validate().unwrap();

        let serialized = serde_yaml::to_string(&manifest).unwrap();
        let reparsed = GatewayConfigManifest::from_yaml_str(&serialized).unwrap();
        assert_eq!(reparsed.spec.storage.staging_dir, manifest.spec.storage.staging_dir);
    }

    #[test]
    fn test_validation() {
        let mut manifest = GatewayConfigManifest::default();
        manifest.spec.storage.root = PathBuf::from("/srv/project");
        manifest.spec.storage.staging_dir = PathBuf::from("/tmp/staging");
        assert!(manifest.validate().is_ok());

        let mut bad = manifest.clone();
        bad.api_version = "v0".to_string();
        assert!(bad.validate().is_err());

        let mut bad = manifest.clone();
        bad.spec.storage.root = PathBuf::from("relative/root");
        assert!(bad.validate().is_err());

        let mut bad = manifest.clone();
        bad.spec.network.route_prefix = "a/b".to_string();
        assert!(bad.validate().is_err());

        let mut bad = manifest;
        bad.spec.network.port = 0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_resolve_paths_makes_root_absolute() {
        let mut manifest = GatewayConfigManifest::default();
        manifest.resolve_paths().unwrap();
        assert!(manifest.spec.storage.root.is_absolute());
        assert!(manifest.validate().is_ok());
    }
}
