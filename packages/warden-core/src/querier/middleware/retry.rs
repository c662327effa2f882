use crate::prelude::*;
use std::time::Duration;

/// Re-runs a failed query with exponential backoff
#[derive(Clone, Debug)]
pub struct QueryRetryMiddleware {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for QueryRetryMiddleware {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(100),
        }
    }
}

impl QueryRetryMiddleware {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub async fn run<REQ: QueryRequest>(
        &self,
        req: REQ,
        client: QueryClient,
    ) -> Result<REQ::QueryResponse> {
        let mut attempts = 0;
        let mut backoff = self.backoff;

        loop {
            attempts += 1;
            match req.request(client.clone()).await {
                Ok(resp) => return Ok(resp),
                Err(err) if attempts < self.max_attempts => {
                    tracing::warn!(attempt = attempts, "query failed, retrying: {err:#}");
                    futures_timer::Delay::new(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
