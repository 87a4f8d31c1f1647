use std::env;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Matches the browser localStorage budget saved artifacts used to live in.
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub text_model: String,
    pub analysis_model: String,
    pub edit_model: String,
    pub analysis_thinking_budget: Option<u32>,
    /// Per-request HTTP timeout. `None` leaves reqwest's default (no timeout).
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub text_model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct UpstashConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub quota_bytes: u64,
    pub use_upstash: bool,
    pub upstash: Option<UpstashConfig>,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub port: Option<u16>,
    pub use_gemini: bool,
    pub use_bedrock: bool,
    pub gemini: Option<GeminiConfig>,
    pub bedrock: Option<BedrockConfig>,
    pub storage: StorageConfig,
}

fn flag(name: &str) -> bool {
    env::var(name).ok().map_or(false, |val| val == "true")
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            analysis_model: "gemini-2.5-pro".to_string(),
            edit_model: "gemini-2.5-flash-image".to_string(),
            analysis_thinking_budget: Some(32768),
            timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok();

        GeminiConfig {
            api_key,
            api_base: env::var("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            text_model: env::var("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            analysis_model: env::var("GEMINI_ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
            edit_model: env::var("GEMINI_EDIT_MODEL").unwrap_or(defaults.edit_model),
            analysis_thinking_budget: defaults.analysis_thinking_budget,
            timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            text_model: "anthropic.claude-3-5-sonnet-20240620-v1:0".to_string(),
            max_tokens: 4096,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        BedrockConfig {
            region: env::var("AWS_REGION")
                .or_else(|_| env::var("AWS_DEFAULT_REGION"))
                .ok(),
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            text_model: env::var("BEDROCK_TEXT_MODEL").unwrap_or(defaults.text_model),
            max_tokens: defaults.max_tokens,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_text_model(mut self, model_id: impl Into<String>) -> Self {
        self.text_model = model_id.into();
        self
    }
}

impl Default for UpstashConfig {
    fn default() -> Self {
        UpstashConfig {
            url: None,
            token: None,
            key: "rgen_studio_artifacts".to_string(),
        }
    }
}

impl UpstashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(mut self, url: impl Into<String>, token: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self.token = Some(token.into());
        self
    }

    pub fn from_env() -> Self {
        UpstashConfig {
            url: env::var("UPSTASH_REDIS_REST_URL").ok(),
            token: env::var("UPSTASH_REDIS_REST_TOKEN").ok(),
            key: env::var("UPSTASH_ARTIFACTS_KEY").unwrap_or_else(|_| Self::default().key),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            path: PathBuf::from("saved_artifacts.json"),
            quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
            use_upstash: false,
            upstash: None,
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let use_upstash = flag("USE_UPSTASH");
        StorageConfig {
            path: env::var("ARTIFACTS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.path),
            quota_bytes: env::var("ARTIFACTS_QUOTA_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.quota_bytes),
            use_upstash,
            upstash: use_upstash.then(UpstashConfig::from_env),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_quota_bytes(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn with_upstash(mut self, config: UpstashConfig) -> Self {
        self.upstash = Some(config);
        self.use_upstash = true;
        self
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            port: None,
            use_gemini: false,
            use_bedrock: false,
            gemini: None,
            bedrock: None,
            storage: StorageConfig::default(),
        }
    }
}

impl StudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Reads every section from the environment. With neither `USE_GEMINI`
    /// nor `USE_BEDROCK` set, Gemini is chosen when a key is present.
    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());
        let mut use_gemini = flag("USE_GEMINI");
        let use_bedrock = flag("USE_BEDROCK");
        let gemini = GeminiConfig::from_env();
        if !use_gemini && !use_bedrock && gemini.api_key.is_some() {
            use_gemini = true;
        }

        StudioConfig {
            port,
            use_gemini,
            use_bedrock,
            gemini: Some(gemini),
            bedrock: use_bedrock.then(BedrockConfig::from_env),
            storage: StorageConfig::from_env(),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = Some(config);
        self.use_gemini = true;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = Some(config);
        self.use_bedrock = true;
        self
    }

    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = config;
        self
    }
}
