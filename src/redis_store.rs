//! redis adapter implementing the IndexStore trait.

use crate::store::{IndexStore, StoreError, StoreResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;

/// IndexStore implementation backed by the redis crate.
///
/// Holds a [`ConnectionManager`], which multiplexes and reconnects on its
/// own; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Wrap an existing connection manager.
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Connect to a Redis server, e.g. `redis://127.0.0.1:6379/`.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client =
            Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn from_redis(e: redis::RedisError) -> StoreError {
    if e.is_connection_refusal() || e.is_timeout() || e.is_io_error() {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Backend(e.to_string())
    }
}

#[async_trait]
impl IndexStore for RedisStore {
    async fn zset_upsert(&self, key: &str, score: f64, member: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)?;
        Ok(())
    }

    async fn zset_remove(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("ZREM")
            .arg(key)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)?;
        Ok(())
    }

    async fn zset_rev_range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        redis::cmd("ZREVRANGE")
            .arg(key)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)
    }

    async fn zset_intersect_store(&self, dest: &str, sources: &[String]) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("ZINTERSTORE");
        cmd.arg(dest).arg(sources.len());
        for key in sources {
            cmd.arg(key);
        }
        let _: () = cmd.query_async(&mut conn).await.map_err(from_redis)?;
        Ok(())
    }

    async fn hash_get(&self, key: &str, field: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        redis::cmd("HGET")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("HSET")
            .arg(key)
            .arg(field)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)?;
        Ok(())
    }

    async fn hash_delete(&self, key: &str, field: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("HDEL")
            .arg(key)
            .arg(field)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)?;
        Ok(())
    }

    async fn hash_multi_get(
        &self,
        key: &str,
        fields: &[String],
    ) -> StoreResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(key);
        for field in fields {
            cmd.arg(field);
        }
        cmd.query_async(&mut conn).await.map_err(from_redis)
    }

    async fn cell_get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)
    }

    async fn cell_set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)?;
        Ok(())
    }

    async fn cell_expire(&self, key: &str, seconds: u64) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(from_redis)?;
        Ok(())
    }
}
