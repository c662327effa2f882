use std::sync::Arc;

use crate::prelude::*;

type LoggerFn = Arc<dyn Fn(String) + Send + Sync>;

/// Logs every outgoing query, by default at `debug` level via tracing
#[derive(Clone)]
pub struct QueryLoggerMiddlewareMapReq {
    pub logger_fn: LoggerFn,
}

impl QueryLoggerMiddlewareMapReq {
    pub fn new<F>(logger_fn: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            logger_fn: Arc::new(logger_fn),
        }
    }

    pub async fn map_req<REQ: QueryRequest>(&self, req: REQ) -> Result<REQ> {
        (self.logger_fn)(format!("query request: {req:?}"));
        Ok(req)
    }
}

impl Default for QueryLoggerMiddlewareMapReq {
    fn default() -> Self {
        Self::new(|msg| tracing::debug!("{msg}"))
    }
}

#[derive(Clone)]
pub struct QueryLoggerMiddlewareMapResp {
    pub logger_fn: LoggerFn,
}

impl QueryLoggerMiddlewareMapResp {
    pub fn new<F>(logger_fn: F) -> Self
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Self {
            logger_fn: Arc::new(logger_fn),
        }
    }

    pub async fn map_resp<RESP: std::fmt::Debug + Send>(&self, resp: RESP) -> Result<RESP> {
        (self.logger_fn)(format!("query response: {resp:?}"));
        Ok(resp)
    }
}

impl Default for QueryLoggerMiddlewareMapResp {
    fn default() -> Self {
        Self::new(|msg| tracing::trace!("{msg}"))
    }
}
