//! # RedisOrderedStore
//!
//! `OrderedStore` over Redis sorted sets, pooled with `deadpool-redis`.
//!
//! Batched lookups are sent as one pipeline, so a batch costs one round
//! trip whichever rank query shape the caller picked.

use async_trait::async_trait;
use deadpool_redis::redis::{cmd, pipe, Pipeline};
use deadpool_redis::{Config, Connection, Pool, PoolConfig, Runtime};
use domains::{Direction, DomainError, OrderedStore, PostId, Result};
use tracing::{debug, instrument};

fn backend_err(err: impl std::fmt::Display) -> DomainError {
    DomainError::backend(err)
}

fn rank_command(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "ZRANK",
        Direction::Reverse => "ZREVRANK",
    }
}

fn range_command(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "ZRANGE",
        Direction::Reverse => "ZREVRANGE",
    }
}

#[derive(Clone)]
pub struct RedisOrderedStore {
    pool: Pool,
}

impl RedisOrderedStore {
    /// Builds a pool of at most `pool_size` connections. Connections are
    /// opened lazily.
    pub fn connect(url: &str, pool_size: usize) -> Result<Self> {
        let mut cfg = Config::from_url(url);
        cfg.pool = Some(PoolConfig::new(pool_size));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(backend_err)?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<Connection> {
        self.pool.get().await.map_err(backend_err)
    }

    async fn run_ranks(&self, pipeline: &Pipeline) -> Result<Vec<Option<u64>>> {
        let mut conn = self.conn().await?;
        pipeline.query_async(&mut conn).await.map_err(backend_err)
    }
}

#[async_trait]
impl OrderedStore for RedisOrderedStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn().await?;
        cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(backend_err)
    }

    async fn exists_many(&self, keys: &[String]) -> Result<Vec<bool>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipeline = pipe();
        for key in keys {
            pipeline.cmd("EXISTS").arg(key);
        }
        let mut conn = self.conn().await?;
        pipeline.query_async(&mut conn).await.map_err(backend_err)
    }

    #[instrument(skip(self))]
    async fn range(
        &self,
        container: &str,
        start: i64,
        stop: i64,
        direction: Direction,
    ) -> Result<Vec<PostId>> {
        let mut conn = self.conn().await?;
        let members: Vec<String> = cmd(range_command(direction))
            .arg(container)
            .arg(start)
            .arg(stop)
            .query_async(&mut conn)
            .await
            .map_err(backend_err)?;
        debug!(found = members.len(), "range query");

        members
            .iter()
            .map(|member| {
                member
                    .parse::<u64>()
                    .map(PostId)
                    .map_err(|_| DomainError::backend(format!("non-numeric member {member:?} in {container}")))
            })
            .collect()
    }

    async fn rank(
        &self,
        container: &str,
        pid: PostId,
        direction: Direction,
    ) -> Result<Option<u64>> {
        let mut conn = self.conn().await?;
        cmd(rank_command(direction))
            .arg(container)
            .arg(pid.0)
            .query_async(&mut conn)
            .await
            .map_err(backend_err)
    }

    async fn ranks(
        &self,
        container: &str,
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<Option<u64>>> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipeline = pipe();
        for pid in pids {
            pipeline.cmd(rank_command(direction)).arg(container).arg(pid.0);
        }
        self.run_ranks(&pipeline).await
    }

    async fn ranks_across(
        &self,
        containers: &[String],
        pids: &[PostId],
        direction: Direction,
    ) -> Result<Vec<Option<u64>>> {
        if containers.len() != pids.len() {
            return Err(DomainError::Validation(format!(
                "{} containers for {} members",
                containers.len(),
                pids.len()
            )));
        }
        if pids.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipeline = pipe();
        for (container, pid) in containers.iter().zip(pids) {
            pipeline.cmd(rank_command(direction)).arg(container).arg(pid.0);
        }
        self.run_ranks(&pipeline).await
    }
}
