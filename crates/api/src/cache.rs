use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use similarity::{SimilarityCheckError, SimilarityScorer};

/// Similarity scores keyed by the SHA-256 of the sentence
pub struct SimilarityCache {
    scores: DashMap<String, u8>,
    max_entries: usize,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl SimilarityCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            scores: DashMap::new(),
            max_entries,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn get(&self, sentence: &str) -> Option<u8> {
        let hit = self.scores.get(&hash_text(sentence)).map(|r| *r.value());
        match hit {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        hit
    }

    pub fn insert(&self, sentence: &str, score: u8) {
        if self.max_entries == 0 {
            return;
        }
        if self.scores.len() >= self.max_entries {
            // Simple eviction: drop a quarter when full
            let to_remove: Vec<_> = self
                .scores
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.scores.remove(&key);
            }
        }
        self.scores.insert(hash_text(sentence), score);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.scores.len(),
            max_entries: self.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn hash_text(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Serves repeated sentences from the cache; only successful scores are stored
pub struct CachedScorer {
    inner: Arc<dyn SimilarityScorer>,
    cache: Arc<SimilarityCache>,
}

impl CachedScorer {
    pub fn new(inner: Arc<dyn SimilarityScorer>, cache: Arc<SimilarityCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl SimilarityScorer for CachedScorer {
    async fn score(&self, sentence: &str) -> Result<u8, SimilarityCheckError> {
        if let Some(score) = self.cache.get(sentence) {
            return Ok(score);
        }
        let score = self.inner.score(sentence).await?;
        self.cache.insert(sentence, score);
        Ok(score)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingScorer {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SimilarityScorer for CountingScorer {
        async fn score(&self, sentence: &str) -> Result<u8, SimilarityCheckError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SimilarityCheckError::Transport("down".to_string()));
            }
            Ok((sentence.chars().count() % 101) as u8)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_eviction_keeps_cache_bounded() {
        let cache = SimilarityCache::new(8);
        for i in 0..20 {
            cache.insert(&format!("sentence {}", i), 10);
        }
        assert!(cache.stats().entries <= 8);
    }

    #[test]
    fn test_hit_and_miss_counts() {
        let cache = SimilarityCache::new(8);
        assert_eq!(cache.get("호치민 출장"), None);
        cache.insert("호치민 출장", 42);
        assert_eq!(cache.get("호치민 출장"), Some(42));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_cached_scorer_calls_inner_once() {
        let inner = Arc::new(CountingScorer {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let scorer = CachedScorer::new(inner.clone(), Arc::new(SimilarityCache::new(16)));

        let first = scorer.score("객실이 넓었죠").await.unwrap();
        let second = scorer.score("객실이 넓었죠").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(scorer.name(), "counting");
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = Arc::new(CountingScorer {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let cache = Arc::new(SimilarityCache::new(16));
        let scorer = CachedScorer::new(inner.clone(), cache.clone());

        assert!(scorer.score("객실").await.is_err());
        assert!(scorer.score("객실").await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().entries, 0);
    }
}
