//! Runtime configuration.

use nativebridge_protocol::{API_VERSION, MAX_MESSAGE_SIZE};

/// Default namespace of the caller-side event handlers.
pub const DEFAULT_SCRIPT_NAMESPACE: &str = "Bridge";

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// API version the bridges report, quoted in unknown-method diagnostics.
    pub api_version: String,

    /// Object on the caller side that owns the `handle*` event functions.
    pub script_namespace: String,

    /// How many consumed or removed async ids the registry remembers.
    pub retired_id_capacity: usize,

    /// Maximum accepted request text size in bytes.
    pub max_message_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            script_namespace: DEFAULT_SCRIPT_NAMESPACE.to_string(),
            retired_id_capacity: 1024,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Creates a configuration reporting the given API version.
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            ..Default::default()
        }
    }

    /// Builder: set script namespace.
    pub fn with_script_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.script_namespace = namespace.into();
        self
    }

    /// Builder: set retired id capacity.
    pub fn with_retired_id_capacity(mut self, capacity: usize) -> Self {
        self.retired_id_capacity = capacity;
        self
    }

    /// Builder: set max message size.
    pub fn with_max_message_size(mut self, max: usize) -> Self {
        self.max_message_size = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.api_version, "2.2.0");
        assert_eq!(config.script_namespace, "Bridge");
        assert_eq!(config.retired_id_capacity, 1024);
        assert_eq!(config.max_message_size, 1024 * 1024);
    }

    #[test]
    fn custom_config() {
        let config = RuntimeConfig::new("3.0.0")
            .with_script_namespace("Adapter")
            .with_retired_id_capacity(8)
            .with_max_message_size(4096);

        assert_eq!(config.api_version, "3.0.0");
        assert_eq!(config.script_namespace, "Adapter");
        assert_eq!(config.retired_id_capacity, 8);
        assert_eq!(config.max_message_size, 4096);
    }
}
