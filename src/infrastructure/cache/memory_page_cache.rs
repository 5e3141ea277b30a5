//! In-process page cache for development and single-instance deployments

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::domain::invoice::{
  errors::CacheError,
  ports::{PageCache, PageLookup},
};

struct CachedPage {
  body: String,
  expires_at: Instant,
}

#[derive(Default)]
struct Pages {
  pages: HashMap<String, CachedPage>,
  generations: HashMap<String, u64>,
}

impl Pages {
  fn generation(&self, path: &str) -> u64 {
    self.generations.get(path).copied().unwrap_or(0)
  }
}

/// In-memory page cache
///
/// Uses RwLock for thread-safe access. Expired entries are treated as
/// missing and dropped on the next write. Generations live under the same
/// lock as the pages, so a stale `put` can never interleave with an
/// `invalidate`.
#[derive(Clone)]
pub struct InMemoryPageCache {
  inner: Arc<RwLock<Pages>>,
  ttl: Duration,
}

impl InMemoryPageCache {
  pub fn new(ttl: Duration) -> Self {
    Self {
      inner: Arc::new(RwLock::new(Pages::default())),
      ttl,
    }
  }
}

#[async_trait]
impl PageCache for InMemoryPageCache {
  async fn get(&self, path: &str) -> Result<PageLookup, CacheError> {
    let inner = self
      .inner
      .read()
      .map_err(|e| CacheError::Backend(format!("Failed to acquire read lock: {}", e)))?;

    let body = inner
      .pages
      .get(path)
      .filter(|page| page.expires_at > Instant::now())
      .map(|page| page.body.clone());

    Ok(PageLookup {
      body,
      generation: inner.generation(path),
    })
  }

  async fn put(&self, path: &str, body: &str, generation: u64) -> Result<bool, CacheError> {
    let mut inner = self
      .inner
      .write()
      .map_err(|e| CacheError::Backend(format!("Failed to acquire write lock: {}", e)))?;

    if inner.generation(path) != generation {
      return Ok(false);
    }

    let now = Instant::now();
    inner.pages.retain(|_, page| page.expires_at > now);
    inner.pages.insert(
      path.to_string(),
      CachedPage {
        body: body.to_string(),
        expires_at: now + self.ttl,
      },
    );

    Ok(true)
  }

  async fn invalidate(&self, path: &str) -> Result<(), CacheError> {
    let mut inner = self
      .inner
      .write()
      .map_err(|e| CacheError::Backend(format!("Failed to acquire write lock: {}", e)))?;

    inner.pages.remove(path);
    *inner.generations.entry(path.to_string()).or_insert(0) += 1;
    Ok(())
  }
}
