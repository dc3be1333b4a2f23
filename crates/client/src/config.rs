use std::path::PathBuf;

/// Host the API token may be sent to when none is configured.
pub const DEFAULT_EXPECTED_HOST: &str = "runpod.ai";

/// Client configuration loaded from environment variables.
///
/// Nothing here is mandatory: a missing endpoint is reported when a
/// workflow is started, not at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Reconstruction service endpoint (full URL of the sync run route).
    pub endpoint: Option<String>,
    /// Bearer credential for the service.
    pub api_token: Option<String>,
    /// Only this host (or its subdomains) receives the bearer credential.
    pub expected_host: String,
    /// Directory model downloads are written to.
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            expected_host: DEFAULT_EXPECTED_HOST.into(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default      |
    /// |----------------------|--------------|
    /// | `TWIN_ENDPOINT`      | unset        |
    /// | `TWIN_API_TOKEN`     | unset        |
    /// | `TWIN_EXPECTED_HOST` | `runpod.ai`  |
    /// | `TWIN_DOWNLOAD_DIR`  | `.`          |
    ///
    /// Empty values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            endpoint: var("TWIN_ENDPOINT"),
            api_token: var("TWIN_API_TOKEN"),
            expected_host: var("TWIN_EXPECTED_HOST").unwrap_or_else(|| DEFAULT_EXPECTED_HOST.into()),
            download_dir: var("TWIN_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// The endpoint, if one is configured and non-blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.endpoint(), None);
        assert_eq!(config.api_token, None);
        assert_eq!(config.expected_host, DEFAULT_EXPECTED_HOST);
        assert_eq!(config.download_dir, PathBuf::from("."));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[
            ("TWIN_ENDPOINT", "   "),
            ("TWIN_API_TOKEN", ""),
            ("TWIN_EXPECTED_HOST", " "),
            ("TWIN_DOWNLOAD_DIR", ""),
        ]);
        assert_eq!(config.endpoint, None);
        assert_eq!(config.api_token, None);
        assert_eq!(config.expected_host, "runpod.ai");
        assert_eq!(config.download_dir, PathBuf::from("."));
    }

    #[test]
    fn values_are_trimmed_and_used() {
        let config = config_from(&[
            ("TWIN_ENDPOINT", " https://api.runpod.ai/v2/abc/runsync "),
            ("TWIN_API_TOKEN", "tok"),
            ("TWIN_EXPECTED_HOST", "example.org"),
            ("TWIN_DOWNLOAD_DIR", "/tmp/models"),
        ]);
        assert_eq!(config.endpoint(), Some("https://api.runpod.ai/v2/abc/runsync"));
        assert_eq!(config.api_token.as_deref(), Some("tok"));
        assert_eq!(config.expected_host, "example.org");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/models"));
    }
}
