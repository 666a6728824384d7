//! Synthesis cache
//!
//! LRU over any backend, keyed on SHA-256 of (text, speaker, sample rate).
//! The speaker is part of the key, so changing voice never replays stale
//! audio; the UI additionally drops its own object-URL caches on voice
//! change.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tts_reader_core::{AudioClip, Speaker};

use crate::{EngineError, SpeechBackend};

type CacheKey = [u8; 32];

/// Caching wrapper around a speech backend
pub struct CachedBackend {
    inner: Arc<dyn SpeechBackend>,
    cache: Mutex<LruCache<CacheKey, AudioClip>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedBackend {
    /// Wrap a backend with an LRU of the given capacity (clamped to >= 1)
    pub fn new(inner: Arc<dyn SpeechBackend>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key(&self, text: &str, speaker: &Speaker) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update([0u8]);
        hasher.update(speaker.name().as_bytes());
        hasher.update(self.inner.sample_rate().to_le_bytes());
        hasher.finalize().into()
    }

    /// Cache hits since startup
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Cache misses since startup
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SpeechBackend for CachedBackend {
    async fn synthesize(&self, text: &str, speaker: &Speaker) -> Result<AudioClip, EngineError> {
        let key = self.key(text, speaker);

        if let Some(clip) = self.cache.lock().get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(clip);
        }

        let clip = self.inner.synthesize(text, speaker).await?;
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.cache.lock().put(key, clip.clone());
        Ok(clip)
    }

    async fn speakers(&self) -> Result<Vec<Speaker>, EngineError> {
        self.inner.speakers().await
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    async fn probe(&self) -> Result<(), EngineError> {
        self.inner.probe().await
    }
}
