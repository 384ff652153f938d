use forge_core::ForgeError;
use forge_quality::ValidationProfile;

/// Server configuration loaded from environment variables.
///
/// | Env Var                | Default    |
/// |------------------------|------------|
/// | `FORGE_HOST`           | `0.0.0.0`  |
/// | `FORGE_PORT`           | `8787`     |
/// | `FORGE_PROFILE`        | `standard` |
/// | `FORGE_MAX_BODY_BYTES` | `10485760` |
///
/// `FORGE_PROFILE` is either a built-in profile name or a path to a YAML file.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub profile: String,
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
            profile: "standard".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ForgeError> {
        let defaults = Self::default();

        let port = match std::env::var("FORGE_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ForgeError::ConfigError(format!("FORGE_PORT must be a valid u16, got {raw}")))?,
            Err(_) => defaults.port,
        };
        let max_body_bytes = match std::env::var("FORGE_MAX_BODY_BYTES") {
            Ok(raw) => raw.parse().map_err(|_| {
                ForgeError::ConfigError(format!("FORGE_MAX_BODY_BYTES must be a byte count, got {raw}"))
            })?,
            Err(_) => defaults.max_body_bytes,
        };

        Ok(Self {
            host: std::env::var("FORGE_HOST").unwrap_or(defaults.host),
            port,
            profile: std::env::var("FORGE_PROFILE").unwrap_or(defaults.profile),
            max_body_bytes,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the configured validation profile.
    pub fn load_profile(&self) -> Result<ValidationProfile, ForgeError> {
        if self.profile.ends_with(".yaml") || self.profile.ends_with(".yml") {
            return ValidationProfile::from_file(&self.profile)
                .map_err(|err| ForgeError::ConfigError(err.to_string()));
        }
        Ok(ValidationProfile::for_name(&self.profile))
    }
}
