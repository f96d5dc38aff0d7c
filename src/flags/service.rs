//! Best-effort flag evaluation used by the handlers.

use std::sync::Arc;

use crate::config::FlagConfig;
use crate::flags::client::HarnessClient;
use crate::flags::types::{FlagDecision, FlagOracle, FlagResult, Target};
use crate::observability::metrics;

/// Process-wide flag settings plus the optional oracle.
///
/// Built once at startup and shared with every request.
#[derive(Clone)]
pub struct FlagService {
    oracle: Option<Arc<dyn FlagOracle>>,
    flag_name: String,
}

impl FlagService {
    pub fn new(oracle: Option<Arc<dyn FlagOracle>>, flag_name: impl Into<String>) -> Self {
        Self {
            oracle,
            flag_name: flag_name.into(),
        }
    }

    /// A service that never calls out and always answers the default.
    pub fn disabled(flag_name: impl Into<String>) -> Self {
        Self::new(None, flag_name)
    }

    /// Build from configuration: a Harness client when an SDK key is set.
    pub fn from_config(config: &FlagConfig) -> FlagResult<Self> {
        let oracle = match &config.sdk_key {
            Some(key) => {
                let client = HarnessClient::new(key.clone(), config)?;
                tracing::info!(flag = %config.flag_name, base_url = %config.base_url, "Feature flags enabled");
                Some(Arc::new(client) as Arc<dyn FlagOracle>)
            }
            None => {
                tracing::info!("FF_SDK_KEY not set, feature flags disabled");
                None
            }
        };
        Ok(Self::new(oracle, config.flag_name.clone()))
    }

    pub fn flag_name(&self) -> &str {
        &self.flag_name
    }

    pub fn is_enabled(&self) -> bool {
        self.oracle.is_some()
    }

    /// Evaluate the configured flag for `target`.
    ///
    /// Never fails: without an oracle, or when the oracle errors, the
    /// result carries `default`.
    pub async fn evaluate_bool(&self, target: &Target, default: bool) -> FlagDecision {
        let Some(oracle) = &self.oracle else {
            return FlagDecision::Disabled(default);
        };

        match oracle.bool_variation(&self.flag_name, target).await {
            Ok(value) => {
                metrics::record_flag_evaluation(if value { "on" } else { "off" });
                tracing::debug!(flag = %self.flag_name, target = %target.identifier, value, "Flag evaluated");
                FlagDecision::Evaluated(value)
            }
            Err(e) => {
                metrics::record_flag_evaluation("fallback");
                tracing::warn!(
                    flag = %self.flag_name,
                    target = %target.identifier,
                    error = %e,
                    default,
                    "Flag evaluation failed, using default"
                );
                FlagDecision::Fallback(default)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::types::FlagError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        answer: Result<bool, ()>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl FlagOracle for Recording {
        async fn bool_variation(&self, flag: &str, target: &Target) -> FlagResult<bool> {
            self.seen
                .lock()
                .unwrap()
                .push((flag.to_string(), target.identifier.clone()));
            self.answer.map_err(|_| FlagError::Auth("nope".into()))
        }
    }

    #[tokio::test]
    async fn test_disabled_returns_default() {
        let flags = FlagService::disabled("color_por_visita");
        assert!(!flags.is_enabled());
        assert_eq!(
            flags.evaluate_bool(&Target::for_visit(2), false).await,
            FlagDecision::Disabled(false)
        );
    }

    #[tokio::test]
    async fn test_passes_flag_name_and_target() {
        let oracle = Arc::new(Recording {
            answer: Ok(true),
            seen: Mutex::new(Vec::new()),
        });
        let flags = FlagService::new(Some(oracle.clone() as Arc<dyn FlagOracle>), "color_por_visita");

        let decision = flags.evaluate_bool(&Target::for_visit(6), false).await;
        assert_eq!(decision, FlagDecision::Evaluated(true));
        assert_eq!(
            oracle.seen.lock().unwrap().as_slice(),
            &[("color_por_visita".to_string(), "user-6".to_string())]
        );
    }

    #[tokio::test]
    async fn test_oracle_failure_falls_back() {
        let oracle = Arc::new(Recording {
            answer: Err(()),
            seen: Mutex::new(Vec::new()),
        });
        let flags = FlagService::new(Some(oracle as Arc<dyn FlagOracle>), "color_por_visita");
        assert_eq!(
            flags.evaluate_bool(&Target::for_visit(2), false).await,
            FlagDecision::Fallback(false)
        );
    }

    #[test]
    fn test_from_config_without_key() {
        let flags = FlagService::from_config(&FlagConfig::default()).unwrap();
        assert!(!flags.is_enabled());
        assert_eq!(flags.flag_name(), "color_por_visita");
    }

    #[test]
    fn test_from_config_with_key() {
        let config = FlagConfig {
            sdk_key: Some("key".into()),
            ..FlagConfig::default()
        };
        assert!(FlagService::from_config(&config).unwrap().is_enabled());
    }
}
