//! Shared application state

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use relay::{GeminiClient, ImageLimits, StoryGenerator};
use similarity::{HttpScorer, SimilarityChecker, SimilarityScorer, StubScorer};
use validate::Validator;

use crate::cache::{CachedScorer, SimilarityCache};
use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::retry::RetryPolicy;

pub struct AppState {
    pub config: AppConfig,
    pub generator: Arc<dyn StoryGenerator>,
    pub checker: SimilarityChecker,
    pub validator: Validator,
    pub image_limits: ImageLimits,
    pub retry: RetryPolicy,
    pub metrics: Arc<Metrics>,
    pub cache: Option<Arc<SimilarityCache>>,
}

impl AppState {
    /// Wire the production components from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let generator: Arc<dyn StoryGenerator> = Arc::new(GeminiClient::new(config.gemini())?);
        if !generator.is_configured() {
            tracing::warn!("GEMINI_API_KEY is not set; story generation will return 503");
        }

        let scorer: Arc<dyn SimilarityScorer> = match &config.similarity.endpoint {
            Some(endpoint) => {
                info!(endpoint = %endpoint, "Using HTTP similarity scorer");
                Arc::new(HttpScorer::new(endpoint.clone()))
            }
            None => Arc::new(StubScorer),
        };

        Ok(Self::with_components(config, generator, scorer))
    }

    /// Assemble state around explicit generator and scorer implementations
    pub fn with_components(
        config: AppConfig,
        generator: Arc<dyn StoryGenerator>,
        scorer: Arc<dyn SimilarityScorer>,
    ) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(SimilarityCache::new(config.cache.max_entries)));

        let scorer: Arc<dyn SimilarityScorer> = match &cache {
            Some(cache) => Arc::new(CachedScorer::new(scorer, Arc::clone(cache))),
            None => scorer,
        };

        Self {
            checker: SimilarityChecker::new(scorer, config.checker()),
            validator: Validator::default(),
            image_limits: config.image_limits(),
            retry: RetryPolicy::from_config(&config.retry),
            metrics: Metrics::new(),
            cache,
            generator,
            config,
        }
    }
}
