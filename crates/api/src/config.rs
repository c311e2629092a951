use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on automatic regeneration attempts
pub const MAX_GENERATION_RETRIES: usize = 2;

/// Room in the JSON body for the keyword, field names and data URL prefixes
const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Smallest request body that can carry `max_total_bytes` of base64 images
pub fn min_body_bytes(max_total_bytes: usize) -> usize {
    max_total_bytes.div_ceil(3) * 4 + BODY_OVERHEAD_BYTES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub images: ImageConfig,
    pub concurrency: ConcurrencyConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    pub similarity: SimilarityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub required_count: usize,
    pub max_image_bytes: usize,
    pub max_total_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    pub max_concurrent_similarity_checks: usize,
    pub similarity_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// External similarity service; the stub scorer is used when unset
    pub endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 5000,
                max_body_bytes: min_body_bytes(40 * 1024 * 1024),
            },
            upstream: UpstreamConfig {
                base_url: relay::gemini::DEFAULT_BASE_URL.to_string(),
                model: relay::gemini::DEFAULT_MODEL.to_string(),
                api_key: None,
                timeout_secs: 120,
            },
            images: ImageConfig {
                required_count: relay::REQUIRED_IMAGES,
                max_image_bytes: 10 * 1024 * 1024,
                max_total_bytes: 40 * 1024 * 1024,
            },
            concurrency: ConcurrencyConfig {
                max_concurrent_similarity_checks: 5,
                similarity_timeout_secs: 5,
            },
            retry: RetryConfig {
                max_retries: 0,
                initial_backoff_ms: 1000,
                max_backoff_ms: 10000,
            },
            cache: CacheConfig {
                enabled: true,
                max_entries: 10000,
            },
            similarity: SimilarityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        let mut body_limit_override = None;

        if let Some(port) = parse(&get, "PORT")? {
            config.server.port = port;
        }
        if let Some(bytes) = parse::<usize, _>(&get, "MAX_BODY_BYTES")? {
            body_limit_override = Some(bytes);
        }

        if let Some(url) = get("GEMINI_API_URL") {
            config.upstream.base_url = url;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            config.upstream.model = model;
        }
        config.upstream.api_key = get("GEMINI_API_KEY");
        if let Some(secs) = parse(&get, "GENERATION_TIMEOUT_SECS")? {
            config.upstream.timeout_secs = secs;
        }
        if let Some(retries) = parse::<usize, _>(&get, "GENERATION_MAX_RETRIES")? {
            config.retry.max_retries = retries.min(MAX_GENERATION_RETRIES);
        }

        if let Some(count) = parse(&get, "REQUIRED_IMAGES")? {
            config.images.required_count = count;
        }
        if let Some(bytes) = parse(&get, "MAX_IMAGE_BYTES")? {
            config.images.max_image_bytes = bytes;
        }
        if let Some(bytes) = parse(&get, "MAX_TOTAL_IMAGE_BYTES")? {
            config.images.max_total_bytes = bytes;
        }

        // The body limit never undercuts the decoded image limit
        let min_body = min_body_bytes(config.images.max_total_bytes);
        config.server.max_body_bytes = body_limit_override.unwrap_or(min_body).max(min_body);

        config.similarity.endpoint = get("SIMILARITY_API_URL");
        if let Some(secs) = parse(&get, "SIMILARITY_TIMEOUT_SECS")? {
            config.concurrency.similarity_timeout_secs = secs;
        }
        if let Some(limit) = parse::<usize, _>(&get, "SIMILARITY_MAX_CONCURRENCY")? {
            config.concurrency.max_concurrent_similarity_checks = limit.max(1);
        }

        if let Some(enabled) = parse(&get, "CACHE_ENABLED")? {
            config.cache.enabled = enabled;
        }
        if let Some(entries) = parse(&get, "CACHE_MAX_ENTRIES")? {
            config.cache.max_entries = entries;
        }

        Ok(config)
    }

    pub fn gemini(&self) -> relay::GeminiConfig {
        relay::GeminiConfig {
            base_url: self.upstream.base_url.clone(),
            model: self.upstream.model.clone(),
            api_key: self.upstream.api_key.clone(),
            timeout: Duration::from_secs(self.upstream.timeout_secs),
            ..relay::GeminiConfig::default()
        }
    }

    pub fn image_limits(&self) -> relay::ImageLimits {
        relay::ImageLimits {
            required_count: self.images.required_count,
            max_image_bytes: self.images.max_image_bytes,
            max_total_bytes: self.images.max_total_bytes,
        }
    }

    pub fn checker(&self) -> similarity::CheckerConfig {
        similarity::CheckerConfig {
            max_concurrent: self.concurrency.max_concurrent_similarity_checks,
            timeout: Duration::from_secs(self.concurrency.similarity_timeout_secs),
        }
    }
}

fn parse<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = AppConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.images.required_count, 14);
        assert_eq!(config.retry.max_retries, 0);
        assert!(config.upstream.api_key.is_none());
        assert!(config.similarity.endpoint.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-test"),
            ("GENERATION_MAX_RETRIES", "7"),
            ("SIMILARITY_API_URL", "http://localhost:9000/score"),
            ("CACHE_ENABLED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini().model, "gemini-test");
        assert_eq!(config.retry.max_retries, MAX_GENERATION_RETRIES);
        assert_eq!(
            config.similarity.endpoint.as_deref(),
            Some("http://localhost:9000/score")
        );
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  "), ("PORT", "")])).unwrap();

        assert!(config.upstream.api_key.is_none());
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_body_limit_fits_encoded_images() {
        let config = AppConfig::default();
        let encoded_total = config.images.max_total_bytes.div_ceil(3) * 4;
        assert!(config.server.max_body_bytes > encoded_total);

        let config = AppConfig::from_lookup(lookup(&[("MAX_BODY_BYTES", "1024")])).unwrap();
        assert_eq!(
            config.server.max_body_bytes,
            min_body_bytes(config.images.max_total_bytes)
        );

        let config = AppConfig::from_lookup(lookup(&[
            ("MAX_TOTAL_IMAGE_BYTES", "3000000"),
            ("MAX_BODY_BYTES", "100000000"),
        ]))
        .unwrap();
        assert_eq!(config.images.max_total_bytes, 3_000_000);
        assert_eq!(config.server.max_body_bytes, 100_000_000);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let config = AppConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "secret")])).unwrap();
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains("secret"));
    }
}
