//! Application constants
//!
//! Single source of truth for paths, header names, and other constants.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/relay.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default chat-completions API path (fallback when not specified in config)
pub const DEFAULT_CHAT_API_PATH: &str = "/v1/chat/completions";

/// Header carrying the upstream provider handle on gateway requests
pub const GATEWAY_PROVIDER_HEADER: &str = "x-relay-provider";

/// Header carrying the dispatch trace id on gateway requests
pub const GATEWAY_TRACE_HEADER: &str = "x-relay-trace-id";

/// Prompt used by the demo driver when none is supplied
pub const DEFAULT_PROMPT: &str = "How many legs does a spider have?";
