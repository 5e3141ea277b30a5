use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Script;

use crate::domain::invoice::{
  errors::CacheError,
  ports::{PageCache, PageLookup},
};

// KEYS[1] page, KEYS[2] generation; ARGV[1] expected generation, ARGV[2] body, ARGV[3] ttl
const STORE_IF_CURRENT: &str = r#"
local current = redis.call('GET', KEYS[2]) or '0'
if current ~= ARGV[1] then
  return 0
end
redis.call('SET', KEYS[1], ARGV[2], 'EX', ARGV[3])
return 1
"#;

/// Redis-backed page cache
///
/// Each path is stored under `{key_prefix}{path}` with a TTL, so a missed
/// invalidation heals itself once the entry expires. `{key_prefix}{path}:gen`
/// counts invalidations; pages are only stored while the generation read
/// before rendering is still current, checked atomically in a Lua script.
pub struct RedisPageCache {
  conn: ConnectionManager,
  key_prefix: String,
  ttl_seconds: u64,
  store_if_current: Script,
}

impl RedisPageCache {
  pub fn new(conn: ConnectionManager, key_prefix: String, ttl_seconds: u64) -> Self {
    Self {
      conn,
      key_prefix,
      ttl_seconds,
      store_if_current: Script::new(STORE_IF_CURRENT),
    }
  }

  fn key(&self, path: &str) -> String {
    format!("{}{}", self.key_prefix, path)
  }

  fn generation_key(&self, path: &str) -> String {
    format!("{}{}:gen", self.key_prefix, path)
  }
}

#[async_trait]
impl PageCache for RedisPageCache {
  async fn get(&self, path: &str) -> Result<PageLookup, CacheError> {
    let mut conn = self.conn.clone();
    let (body, generation): (Option<String>, Option<u64>) = redis::pipe()
      .get(self.key(path))
      .get(self.generation_key(path))
      .query_async(&mut conn)
      .await?;

    Ok(PageLookup {
      body,
      generation: generation.unwrap_or(0),
    })
  }

  async fn put(&self, path: &str, body: &str, generation: u64) -> Result<bool, CacheError> {
    let mut conn = self.conn.clone();
    let stored: i64 = self
      .store_if_current
      .key(self.key(path))
      .key(self.generation_key(path))
      .arg(generation)
      .arg(body)
      .arg(self.ttl_seconds)
      .invoke_async(&mut conn)
      .await?;

    Ok(stored == 1)
  }

  async fn invalidate(&self, path: &str) -> Result<(), CacheError> {
    let mut conn = self.conn.clone();
    let (removed, generation): (u64, u64) = redis::pipe()
      .atomic()
      .del(self.key(path))
      .incr(self.generation_key(path), 1)
      .query_async(&mut conn)
      .await?;
    tracing::debug!(path, removed, generation, "Invalidated cached page");
    Ok(())
  }
}
