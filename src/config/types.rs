use serde::Deserialize;

/// Main configuration structure for Content Auditor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audit: AuditConfig,
    pub budget: BudgetConfig,
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub tone: ToneConfig,
    pub output: OutputConfig,
}

/// Batch behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuditConfig {
    /// Maximum number of URLs taken from the input list
    pub max_pages: usize,

    /// Number of pages between progress reports
    pub batch_size: usize,

    /// Number of pages audited at the same time
    pub concurrency: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            max_pages: 200,
            batch_size: 20,
            concurrency: 1,
        }
    }
}

/// LLM call budget
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BudgetConfig {
    /// Maximum number of tone analysis calls per run
    pub max_llm_calls: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self { max_llm_calls: 200 }
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,

    /// User-Agent header sent with every page request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_redirects: 10,
            user_agent: concat!("content-auditor/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExtractConfig {
    /// Maximum characters of extracted text kept per page
    pub max_text_length: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_text_length: 50_000,
        }
    }
}

/// Tone analysis (local model endpoint) configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToneConfig {
    /// Whether tone analysis runs at all
    pub enabled: bool,

    /// Model name passed to the endpoint
    pub model: String,

    /// Base URL of the model server
    pub base_url: String,

    /// Maximum characters of page text sent to the model
    pub max_input_length: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "llama3.1:8b-instruct".to_string(),
            base_url: "http://localhost:11434".to_string(),
            max_input_length: 1200,
            temperature: 0.3,
            timeout_seconds: 120,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory holding one cache file per audited URL
    pub cache_dir: String,

    /// Directory receiving `pages.jsonl` and `summary.csv`
    pub reports_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cache_dir: ".cache".to_string(),
            reports_dir: "reports".to_string(),
        }
    }
}
