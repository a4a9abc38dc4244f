//! Session visit counter stored in Redis

use redis::Client;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SessionService {
    client: Client,
    ttl_seconds: u64,
}

impl SessionService {
    /// Create the client. No connection is made until first use.
    pub fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;
        Ok(Self { client, ttl_seconds })
    }

    /// Lifetime of a session cookie and its counter
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }

    /// Count one more visit for the session and return the new total.
    /// The counter expires with the session.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = visits_key(session_id);

        let (visits,): (i64,) = redis::pipe()
            .atomic()
            .incr(&key, 1)
            .expire(&key, self.ttl_seconds as i64)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(visits)
    }
}

fn visits_key(session_id: &str) -> String {
    format!("visits:{}", session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_does_not_connect() {
        let sessions = SessionService::new("redis://127.0.0.1:1", 60).unwrap();
        assert_eq!(sessions.ttl_seconds(), 60);
        assert!(SessionService::new("not a url", 60).is_err());
    }

    #[test]
    fn test_key() {
        assert_eq!(visits_key("abc"), "visits:abc");
    }
}
