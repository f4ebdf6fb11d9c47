//! Timestamp authority configuration with validation.
//!
//! One [`TsaConfig`] per authority, collected in a [`TsaRegistry`] with a
//! single active entry. Read once at startup from the environment.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use super::der::{self, DerLengthForm};
use super::errors::ConfigError;

/// Per-request network bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Preset active when `TSA_PROVIDER` is unset.
pub const DEFAULT_PROVIDER: &str = "freetsa";

/// Registry key for the `TSA_URL` override.
pub const CUSTOM_PROVIDER: &str = "custom";

/// HTTP basic-auth credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsaCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for TsaCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsaCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One timestamp authority.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsaConfig {
    /// Registry key (`freetsa`, `digicert`, ...).
    pub name: String,
    pub url: String,
    /// Display name recorded on tokens.
    pub provider_name: String,
    #[serde(default)]
    pub credentials: Option<TsaCredentials>,
    /// PEM bundle (certificate and key) presented as TLS client identity.
    #[serde(default, skip_serializing)]
    pub client_cert: Option<String>,
    /// Requested policy, sent as `reqPolicy`.
    #[serde(default)]
    pub policy_oid: Option<String>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_ms", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(default)]
    pub der_length: DerLengthForm,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl TsaConfig {
    /// Config with defaults for everything but the identity.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            provider_name: provider_name.into(),
            credentials: None,
            client_cert: None,
            policy_oid: None,
            timeout: DEFAULT_TIMEOUT,
            der_length: DerLengthForm::default(),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(TsaCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_policy_oid(mut self, policy_oid: impl Into<String>) -> Self {
        self.policy_oid = Some(policy_oid.into());
        self
    }

    pub fn with_client_cert(mut self, pem: impl Into<String>) -> Self {
        self.client_cert = Some(pem.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_der_length(mut self, form: DerLengthForm) -> Self {
        self.der_length = form;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::MissingUrl(self.name.clone()));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(format!(
                "{}: timeout cannot be 0",
                self.name
            )));
        }
        if let Some(policy) = &self.policy_oid {
            if der::encode_oid_content(policy).is_none() {
                return Err(ConfigError::InvalidPolicyOid(policy.clone()));
            }
        }
        Ok(())
    }
}

/// Built-in public authorities.
pub fn presets() -> Vec<TsaConfig> {
    vec![
        TsaConfig::new("freetsa", "https://freetsa.org/tsr", "FreeTSA"),
        TsaConfig::new("digicert", "http://timestamp.digicert.com", "DigiCert"),
        TsaConfig::new("sectigo", "http://timestamp.sectigo.com", "Sectigo"),
        TsaConfig::new("certum", "http://time.certum.pl", "Certum"),
    ]
}

/// Named authorities with one active entry.
#[derive(Debug, Clone)]
pub struct TsaRegistry {
    configs: BTreeMap<String, TsaConfig>,
    active: String,
}

impl Default for TsaRegistry {
    fn default() -> Self {
        Self::with_presets()
    }
}

impl TsaRegistry {
    /// Registry holding the presets, `freetsa` active.
    pub fn with_presets() -> Self {
        Self {
            configs: presets()
                .into_iter()
                .map(|config| (config.name.clone(), config))
                .collect(),
            active: DEFAULT_PROVIDER.to_string(),
        }
    }

    /// Add or replace an authority.
    pub fn register(&mut self, config: TsaConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.configs.insert(config.name.clone(), config);
        Ok(())
    }

    /// Make `name` the active authority.
    pub fn set_active(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.configs.contains_key(name) {
            return Err(ConfigError::UnknownProvider(name.to_string()));
        }
        self.active = name.to_string();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TsaConfig> {
        self.configs.get(name)
    }

    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// The active authority.
    pub fn active(&self) -> &TsaConfig {
        // `set_active` only accepts registered names and nothing removes entries.
        &self.configs[&self.active]
    }

    /// The explicit override when given, otherwise the active authority.
    pub fn resolve(&self, override_name: Option<&str>) -> Result<&TsaConfig, ConfigError> {
        match override_name {
            Some(name) => self
                .configs
                .get(name)
                .ok_or_else(|| ConfigError::UnknownProvider(name.to_string())),
            None => Ok(self.active()),
        }
    }

    /// Active authority first, then the rest in name order.
    pub fn failover_order(&self) -> Vec<TsaConfig> {
        std::iter::once(self.active().clone())
            .chain(
                self.configs
                    .values()
                    .filter(|config| config.name != self.active)
                    .cloned(),
            )
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TsaConfig> {
        self.configs.values()
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TSA_PROVIDER`: active preset (default: freetsa)
    /// - `TSA_URL`: custom authority URL; registers and activates `custom`
    /// - `TSA_NAME`: display name of the custom authority
    /// - `TSA_USERNAME` / `TSA_PASSWORD`: basic auth for the active authority
    /// - `TSA_POLICY_OID`: requested policy for the active authority
    /// - `TSA_CLIENT_CERT`: path to a PEM client identity for the active authority
    /// - `TSA_TIMEOUT_SECS`: per-request bound for every authority (default: 10)
    /// - `TSA_STRICT_DER`: `true` for minimal outer length encoding
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`TsaRegistry::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut registry = Self::with_presets();

        let timeout = match var("TSA_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT,
        };
        let der_length = match var("TSA_STRICT_DER").as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("yes") => DerLengthForm::Minimal,
            _ => DerLengthForm::FixedLong,
        };

        if let Some(url) = var("TSA_URL") {
            let name = var("TSA_NAME").unwrap_or_else(|| "Custom TSA".to_string());
            registry.register(TsaConfig::new(CUSTOM_PROVIDER, url, name))?;
            registry.set_active(CUSTOM_PROVIDER)?;
        } else {
            let provider = var("TSA_PROVIDER").unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
            registry.set_active(provider.trim())?;
        }

        let mut active = registry.active().clone();
        if let Some(username) = var("TSA_USERNAME") {
            active = active.with_credentials(username, var("TSA_PASSWORD").unwrap_or_default());
        }
        if let Some(policy) = var("TSA_POLICY_OID") {
            active = active.with_policy_oid(policy.trim());
        }
        if let Some(path) = var("TSA_CLIENT_CERT") {
            let pem = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ClientCert(format!("{path}: {e}")))?;
            active = active.with_client_cert(pem);
        }
        registry.register(active)?;

        for config in registry.configs.values_mut() {
            config.timeout = timeout;
            config.der_length = der_length;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let registry = TsaRegistry::from_lookup(lookup(&[])).unwrap();
        assert_eq!(registry.active_name(), "freetsa");
        assert_eq!(registry.active().url, "https://freetsa.org/tsr");
        assert_eq!(registry.active().timeout, DEFAULT_TIMEOUT);
        assert_eq!(registry.active().der_length, DerLengthForm::FixedLong);
        assert_eq!(registry.iter().count(), 4);
    }

    #[test]
    fn test_select_preset() {
        let registry = TsaRegistry::from_lookup(lookup(&[("TSA_PROVIDER", "digicert")])).unwrap();
        assert_eq!(registry.active().provider_name, "DigiCert");
    }

    #[test]
    fn test_unknown_provider() {
        let err = TsaRegistry::from_lookup(lookup(&[("TSA_PROVIDER", "nope")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownProvider("nope".into()));
    }

    #[test]
    fn test_custom_authority_overrides() {
        let registry = TsaRegistry::from_lookup(lookup(&[
            ("TSA_URL", "https://tsa.example.com/rfc3161"),
            ("TSA_NAME", "Example TSA"),
            ("TSA_USERNAME", "agency"),
            ("TSA_PASSWORD", "s3cret"),
            ("TSA_POLICY_OID", "1.2.3.4.1"),
            ("TSA_TIMEOUT_SECS", "3"),
            ("TSA_STRICT_DER", "true"),
        ]))
        .unwrap();
        let active = registry.active();
        assert_eq!(active.name, CUSTOM_PROVIDER);
        assert_eq!(active.provider_name, "Example TSA");
        assert_eq!(active.credentials.as_ref().unwrap().username, "agency");
        assert_eq!(active.policy_oid.as_deref(), Some("1.2.3.4.1"));
        assert_eq!(active.timeout, Duration::from_secs(3));
        assert_eq!(active.der_length, DerLengthForm::Minimal);
        // Global settings reach the presets too.
        assert_eq!(registry.get("sectigo").unwrap().timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_timeout_and_policy() {
        assert!(matches!(
            TsaRegistry::from_lookup(lookup(&[("TSA_TIMEOUT_SECS", "0")])),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            TsaRegistry::from_lookup(lookup(&[("TSA_POLICY_OID", "policy")])),
            Err(ConfigError::InvalidPolicyOid(_))
        ));
    }

    #[test]
    fn test_missing_client_cert_file() {
        assert!(matches!(
            TsaRegistry::from_lookup(lookup(&[("TSA_CLIENT_CERT", "/nonexistent/cert.pem")])),
            Err(ConfigError::ClientCert(_))
        ));
    }

    #[test]
    fn test_resolve_and_failover_order() {
        let mut registry = TsaRegistry::with_presets();
        registry.set_active("sectigo").unwrap();
        assert_eq!(registry.resolve(None).unwrap().name, "sectigo");
        assert_eq!(registry.resolve(Some("certum")).unwrap().name, "certum");
        assert!(registry.resolve(Some("missing")).is_err());

        let order: Vec<String> = registry.failover_order().into_iter().map(|c| c.name).collect();
        assert_eq!(order, vec!["sectigo", "certum", "digicert", "freetsa"]);
    }

    #[test]
    fn test_register_validates() {
        let mut registry = TsaRegistry::with_presets();
        assert_eq!(
            registry.register(TsaConfig::new("empty", "", "Empty")),
            Err(ConfigError::MissingUrl("empty".into()))
        );
        assert!(registry
            .register(TsaConfig::new("zero", "http://x", "Zero").with_timeout(Duration::ZERO))
            .is_err());
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let config = TsaConfig::new("x", "http://x", "X").with_credentials("user", "hunter2");
        let debug = format!("{config:?}");
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_config_serde_uses_millis() {
        let config = TsaConfig::new("x", "http://x", "X").with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["timeout_ms"], 1500);
        let back: TsaConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.timeout, Duration::from_millis(1500));
    }
}
