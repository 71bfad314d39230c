use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use super::{effective_timeout, ConnectionConfig, ListStore};
use crate::error::StoreError;

/// Redis-backed list store.
///
/// Non-blocking commands share one multiplexed connection. Redis answers a
/// connection's commands in order, so every BLPOP/BRPOP gets a connection of
/// its own; a put on the same store is never queued behind a waiting pop.
/// Dropping a blocking pop closes its connection, which ends the wait on
/// the server too.
pub struct RedisStore {
    config: ConnectionConfig,
    client: redis::Client,
    connection: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(config: ConnectionConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.connection_info())?;
        let connection = client.get_multiplexed_async_connection().await?;

        tracing::info!(
            "Connected to redis at {}:{} (db {})",
            config.host,
            config.port,
            config.db
        );

        Ok(Self {
            config,
            client,
            connection,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    async fn blocking_pop(
        &self,
        command: &str,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError> {
        // BLPOP/BRPOP treat 0 as "block forever".
        let seconds = effective_timeout(timeout).map_or(0.0, |t| t.as_secs_f64());
        tracing::debug!("{} {} timeout={}s", command, key, seconds);

        let mut connection = self.client.get_multiplexed_async_connection().await?;
        let reply: Option<(String, Vec<u8>)> = redis::cmd(command)
            .arg(key)
            .arg(seconds)
            .query_async(&mut connection)
            .await?;

        Ok(reply.map(|(_, payload)| Bytes::from(payload)))
    }
}

impl fmt::Display for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "host='{}', port={}, db={}",
            self.config.host, self.config.port, self.config.db
        )
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("db", &self.config.db)
            .finish()
    }
}

#[async_trait]
impl ListStore for RedisStore {
    async fn push_tail(&self, key: &str, payloads: Vec<Bytes>) -> Result<(), StoreError> {
        tracing::debug!("RPUSH {} ({} values)", key, payloads.len());
        let values: Vec<&[u8]> = payloads.iter().map(|p| p.as_ref()).collect();
        let _: i64 = self.connection().rpush(key, values).await?;
        Ok(())
    }

    async fn push_head(&self, key: &str, payloads: Vec<Bytes>) -> Result<(), StoreError> {
        tracing::debug!("LPUSH {} ({} values)", key, payloads.len());
        let values: Vec<&[u8]> = payloads.iter().map(|p| p.as_ref()).collect();
        let _: i64 = self.connection().lpush(key, values).await?;
        Ok(())
    }

    async fn pop_head(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        tracing::debug!("LPOP {}", key);
        let payload: Option<Vec<u8>> = self.connection().lpop(key, None).await?;
        Ok(payload.map(Bytes::from))
    }

    async fn pop_tail(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        tracing::debug!("RPOP {}", key);
        let payload: Option<Vec<u8>> = self.connection().rpop(key, None).await?;
        Ok(payload.map(Bytes::from))
    }

    async fn blocking_pop_head(
        &self,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError> {
        self.blocking_pop("BLPOP", key, timeout).await
    }

    async fn blocking_pop_tail(
        &self,
        key: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Bytes>, StoreError> {
        self.blocking_pop("BRPOP", key, timeout).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        tracing::debug!("DEL {}", key);
        let _: i64 = self.connection().del(key).await?;
        Ok(())
    }

    async fn len(&self, key: &str) -> Result<usize, StoreError> {
        let len: i64 = self.connection().llen(key).await?;
        usize::try_from(len)
            .map_err(|_| StoreError::UnexpectedResponse(format!("LLEN {} returned {}", key, len)))
    }
}
