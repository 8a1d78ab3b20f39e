//! What gets persisted: variable names, routing choice and the resulting assignments
//!
//! Everything here is pure. Writing the assignments is the job of
//! [`crate::persist`].

use crate::config::SetupConfig;
use std::fmt;

/// The environment variables this tool manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvVar {
    ApiKey,
    BaseUrl,
    Model,
    SmallFastModel,
}

impl EnvVar {
    pub const ALL: [EnvVar; 4] = [
        EnvVar::ApiKey,
        EnvVar::BaseUrl,
        EnvVar::Model,
        EnvVar::SmallFastModel,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ApiKey => "UNBOUND_API_KEY",
            Self::BaseUrl => "ANTHROPIC_BASE_URL",
            Self::Model => "ANTHROPIC_MODEL",
            Self::SmallFastModel => "ANTHROPIC_SMALL_FAST_MODEL",
        }
    }

    /// Whether values of this variable must be masked in output
    #[must_use]
    pub fn is_secret(self) -> bool {
        matches!(self, Self::ApiKey)
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single `NAME=value` pair to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvAssignment {
    pub var: EnvVar,
    pub value: String,
}

impl EnvAssignment {
    pub fn new(var: EnvVar, value: impl Into<String>) -> Self {
        Self {
            var,
            value: value.into(),
        }
    }

    /// Line written to a POSIX shell profile
    #[must_use]
    pub fn export_line(&self) -> String {
        format!("export {}=\"{}\"", self.var.name(), self.value)
    }

    /// Value safe to print to the terminal
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.var.is_secret() {
            mask_secret(&self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Keep the first four characters of a secret, mask the rest
#[must_use]
pub fn mask_secret(value: &str) -> String {
    let visible: String = value.chars().take(4).collect();
    format!("{visible}****")
}

/// How Claude Code requests get routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingChoice {
    /// Point the client at the Unbound proxy
    Direct { base_url: String },

    /// Vertex AI routing through explicit model identifiers
    ModelIds {
        model: String,
        small_fast_model: String,
    },
}

impl RoutingChoice {
    pub fn direct(config: &SetupConfig) -> Self {
        Self::Direct {
            base_url: config.base_url.clone(),
        }
    }

    /// Vertex routing, with `None` or blank overrides falling back to the defaults
    pub fn model_ids(
        config: &SetupConfig,
        model: Option<&str>,
        small_fast_model: Option<&str>,
    ) -> Self {
        let pick = |custom: Option<&str>, default: &str| {
            custom
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        Self::ModelIds {
            model: pick(model, &config.default_model),
            small_fast_model: pick(small_fast_model, &config.default_small_fast_model),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "standard Unbound",
            Self::ModelIds { .. } => "Vertex AI",
        }
    }

    /// Assignments this routing mode produces, in write order
    #[must_use]
    pub fn assignments(&self) -> Vec<EnvAssignment> {
        match self {
            Self::Direct { base_url } => vec![EnvAssignment::new(EnvVar::BaseUrl, base_url)],
            Self::ModelIds {
                model,
                small_fast_model,
            } => vec![
                EnvAssignment::new(EnvVar::Model, model),
                EnvAssignment::new(EnvVar::SmallFastModel, small_fast_model),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_line_quotes_value() {
        let assignment = EnvAssignment::new(EnvVar::ApiKey, "abc123");
        assert_eq!(assignment.export_line(), "export UNBOUND_API_KEY=\"abc123\"");
    }

    #[test]
    fn api_key_is_masked_for_display() {
        assert_eq!(EnvAssignment::new(EnvVar::ApiKey, "sk-live-123").display_value(), "sk-l****");
        assert_eq!(EnvAssignment::new(EnvVar::ApiKey, "ab").display_value(), "ab****");
        assert_eq!(
            EnvAssignment::new(EnvVar::BaseUrl, "https://api.getunbound.ai").display_value(),
            "https://api.getunbound.ai"
        );
    }

    #[test]
    fn direct_routing_sets_only_base_url() {
        let routing = RoutingChoice::direct(&SetupConfig::default());
        assert_eq!(
            routing.assignments(),
            vec![EnvAssignment::new(EnvVar::BaseUrl, "https://api.getunbound.ai")]
        );
    }

    #[test]
    fn model_routing_uses_defaults_for_blank_overrides() {
        let config = SetupConfig::default();
        let routing = RoutingChoice::model_ids(&config, Some("  "), None);
        assert_eq!(
            routing.assignments(),
            vec![
                EnvAssignment::new(EnvVar::Model, "anthropic.claude-sonnet-4-5@20250929"),
                EnvAssignment::new(EnvVar::SmallFastModel, "anthropic.claude-3-5-haiku@20241022"),
            ]
        );
    }

    #[test]
    fn model_routing_keeps_custom_values() {
        let config = SetupConfig::default();
        let routing = RoutingChoice::model_ids(&config, None, Some(" custom-haiku "));
        let assignments = routing.assignments();
        assert_eq!(assignments[0].value, config.default_model);
        assert_eq!(assignments[1].value, "custom-haiku");
        assert!(assignments.iter().all(|a| a.var != EnvVar::BaseUrl));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = EnvVar::ALL.iter().map(|v| v.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EnvVar::ALL.len());
    }
}
