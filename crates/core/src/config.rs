//! Platform constants injected into the classifier and resolver.
//!
//! Defaults match the Gardener extension contract. Each value can be overridden from the
//! environment (`EXTKIT_*`) or loaded from JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_OPERATION_ANNOTATION: &str = "gardener.cloud/operation";
pub const DEFAULT_OPERATION_MIGRATE: &str = "migrate";
pub const DEFAULT_OPERATION_RESTORE: &str = "restore";
pub const DEFAULT_EXTENSION_TYPE: &str = "shoot-dns-service";
pub const DEFAULT_EXTENSION_KIND: &str = "extensions.gardener.cloud/v1alpha1/Extension";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid kind key: {0} (expect v1/Kind or group/v1/Kind)")]
    InvalidKind(String),
    #[error("invalid config: {0}")]
    Parse(String),
}

/// Well-known strings owned by the host platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlatformConstants {
    /// Annotation key holding the requested lifecycle operation.
    pub operation_annotation: String,
    pub migrate_value: String,
    pub restore_value: String,
    /// `spec.type` of the extension this controller owns.
    pub extension_type: String,
}

impl Default for PlatformConstants {
    fn default() -> Self {
        Self {
            operation_annotation: DEFAULT_OPERATION_ANNOTATION.to_string(),
            migrate_value: DEFAULT_OPERATION_MIGRATE.to_string(),
            restore_value: DEFAULT_OPERATION_RESTORE.to_string(),
            extension_type: DEFAULT_EXTENSION_TYPE.to_string(),
        }
    }
}

/// Group/version/kind of the managed resource stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExtensionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl ExtensionKind {
    /// Parse `v1/Kind` or `group/v1/Kind`.
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        let parts: Vec<_> = key.split('/').collect();
        let (group, version, kind) = match parts.as_slice() {
            [version, kind] => ("", *version, *kind),
            [group, version, kind] => (*group, *version, *kind),
            _ => return Err(ConfigError::InvalidKind(key.to_string())),
        };
        if version.is_empty() || kind.is_empty() {
            return Err(ConfigError::InvalidKind(key.to_string()));
        }
        Ok(Self { group: group.to_string(), version: version.to_string(), kind: kind.to_string() })
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl Default for ExtensionKind {
    fn default() -> Self {
        Self {
            group: "extensions.gardener.cloud".to_string(),
            version: "v1alpha1".to_string(),
            kind: "Extension".to_string(),
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.api_version(), self.kind)
    }
}

/// Full configuration handed to the reconciliation helpers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ExtKitConfig {
    pub constants: PlatformConstants,
    pub kind: ExtensionKind,
}

impl ExtKitConfig {
    /// Defaults overridden by `EXTKIT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        let c = &mut cfg.constants;
        if let Some(v) = get("EXTKIT_OPERATION_ANNOTATION") { c.operation_annotation = v; }
        if let Some(v) = get("EXTKIT_OPERATION_MIGRATE") { c.migrate_value = v; }
        if let Some(v) = get("EXTKIT_OPERATION_RESTORE") { c.restore_value = v; }
        if let Some(v) = get("EXTKIT_EXTENSION_TYPE") { c.extension_type = v; }
        if let Some(v) = get("EXTKIT_EXTENSION_KIND") {
            cfg.kind = ExtensionKind::parse(&v)?;
        }
        Ok(cfg)
    }

    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
