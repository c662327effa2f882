use std::sync::{Arc, Mutex};

/// Shared http connection pool, held by every QueryClient built from it
#[derive(Clone, Default)]
pub struct WardenCache {
    http: Arc<Mutex<Option<reqwest::Client>>>,
}

impl WardenCache {
    /// Pre-populate with a client built elsewhere (custom timeouts, proxies, etc.)
    pub fn with_http_client(client: reqwest::Client) -> Self {
        Self {
            http: Arc::new(Mutex::new(Some(client))),
        }
    }

    pub fn get_http_client(&self) -> reqwest::Client {
        let mut guard = match self.http.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        guard.get_or_insert_with(reqwest::Client::new).clone()
    }
}

impl std::fmt::Debug for WardenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardenCache").finish_non_exhaustive()
    }
}
