//! Runtime configuration from the environment

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcadeConfig {
    /// `ARCADE_PORT`, default 8000
    pub port: u16,
    /// `ARCADE_SEED`; fixes every random choice when set
    pub seed: Option<u64>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            seed: None,
        }
    }
}

impl ArcadeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("ARCADE_PORT")
            .and_then(|raw| match raw.trim().parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        default = defaults.port,
                        "Ignoring unparsable ARCADE_PORT"
                    );
                    None
                }
            })
            .unwrap_or(defaults.port);
        let seed = lookup("ARCADE_SEED").and_then(|raw| match raw.trim().parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %raw, "Ignoring unparsable ARCADE_SEED");
                None
            }
        });
        Self { port, seed }
    }
}
