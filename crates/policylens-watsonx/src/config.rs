//! watsonx credentials and endpoints

use serde::{Deserialize, Serialize};
use std::env;
use policylens_core::{Error, Result};

pub const DEFAULT_IAM_HOST: &str = "iam.cloud.ibm.com";
pub const DEFAULT_API_URL: &str = "https://us-south.ml.cloud.ibm.com";

/// Credentials and endpoints for the watsonx text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatsonxConfig {
    pub api_key: String,
    pub project_id: String,
    /// IAM host name, without scheme
    pub iam_url: String,
    pub api_url: String,
    pub model_id: Option<String>,
}

impl WatsonxConfig {
    /// Read configuration from the process environment (and `.env`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// `WATSONX_*` names win over the short `API_KEY`/`PROJECT_ID` forms.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let api_key = var(&["WATSONX_API_KEY", "API_KEY"]).ok_or_else(|| {
            Error::Configuration("WATSONX_API_KEY or API_KEY is not set".to_string())
        })?;
        let project_id = var(&["WATSONX_PROJECT_ID", "PROJECT_ID"]).ok_or_else(|| {
            Error::Configuration("WATSONX_PROJECT_ID or PROJECT_ID is not set".to_string())
        })?;

        let config = Self {
            api_key,
            project_id,
            iam_url: var(&["IAM_IBM_CLOUD_URL"])
                .map(|url| strip_scheme(&url).to_string())
                .unwrap_or_else(|| DEFAULT_IAM_HOST.to_string()),
            api_url: var(&["WATSONX_API_URL"])
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model_id: var(&["WATSONX_MODEL_ID"]),
        };
        config.validate()?;
        Ok(config)
    }

    /// Configuration with explicit credentials and default endpoints
    pub fn new(api_key: String, project_id: String) -> Self {
        Self {
            api_key,
            project_id,
            iam_url: DEFAULT_IAM_HOST.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            model_id: None,
        }
    }

    /// Reject configurations the client could never authenticate with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Configuration("watsonx API key is empty".to_string()));
        }
        if self.project_id.trim().is_empty() {
            return Err(Error::Configuration("watsonx project id is empty".to_string()));
        }
        if self.iam_url.trim().is_empty() || self.iam_url.contains("://") {
            return Err(Error::Configuration(format!(
                "IAM url must be a host name, got '{}'",
                self.iam_url
            )));
        }
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(Error::Configuration(format!(
                "watsonx API url must start with http:// or https://, got '{}'",
                self.api_url
            )));
        }
        Ok(())
    }
}

fn strip_scheme(url: &str) -> &str {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}
