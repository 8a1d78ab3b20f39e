//! Setup configuration and the fixed values the tool writes.

use std::path::PathBuf;

/// Models listing endpoint used to verify an API key
pub const DEFAULT_MODELS_URL: &str = "https://api.getunbound.ai/v1/models";

/// Proxy endpoint written to `ANTHROPIC_BASE_URL` for direct routing
pub const DEFAULT_BASE_URL: &str = "https://api.getunbound.ai";

/// Default primary model for Vertex routing
pub const DEFAULT_VERTEX_MODEL: &str = "anthropic.claude-sonnet-4-5@20250929";

/// Default small/fast model for Vertex routing
pub const DEFAULT_VERTEX_SMALL_FAST_MODEL: &str = "anthropic.claude-3-5-haiku@20241022";

/// Comment written once above the first export line in a shell profile
pub const PROFILE_HEADER: &str = "# Claude Code Configuration";

/// Verification request timeout in seconds
pub const VERIFY_TIMEOUT_SECS: u64 = 10;

/// Configuration for a setup run.
///
/// `Default` yields the production endpoints; the CLI layers flags and
/// environment variables on top.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Endpoint the API key is verified against
    pub models_url: String,

    /// Value written to `ANTHROPIC_BASE_URL` for direct routing
    pub base_url: String,

    /// Defaults offered for Vertex routing
    pub default_model: String,
    pub default_small_fast_model: String,

    /// Explicit shell profile, bypassing platform detection
    pub profile_override: Option<PathBuf>,

    /// Verify for real but write nothing
    pub dry_run: bool,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            models_url: DEFAULT_MODELS_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: DEFAULT_VERTEX_MODEL.to_string(),
            default_small_fast_model: DEFAULT_VERTEX_SMALL_FAST_MODEL.to_string(),
            profile_override: None,
            dry_run: false,
        }
    }
}
