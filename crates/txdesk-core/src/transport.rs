//! Remote call transport and the caching fetch adapter
//!
//! `Transport` performs one named remote call. `CustomFetch` wraps a
//! transport with a response cache keyed by endpoint and serialized
//! parameters, and tracks how many calls are in flight.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{CoreError, CoreResult};
use crate::types::Endpoint;

/// A named remote call with a JSON request/response contract
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, endpoint: Endpoint, params: serde_json::Value) -> CoreResult<serde_json::Value>;
}

/// Transport reference type
pub type TransportRef = Arc<dyn Transport>;

/// Caching adapter over a `Transport`
pub struct CustomFetch {
    transport: TransportRef,
    cache: RwLock<HashMap<String, serde_json::Value>>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight counter even if the request future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn cache_key(endpoint: Endpoint, params: &serde_json::Value) -> String {
    format!("{}@{}", endpoint, params)
}

fn decode<T: DeserializeOwned>(endpoint: Endpoint, value: serde_json::Value) -> CoreResult<T> {
    serde_json::from_value(value).map_err(|e| CoreError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

impl CustomFetch {
    pub fn new(transport: TransportRef) -> Self {
        Self {
            transport,
            cache: RwLock::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Call `endpoint`, answering from the cache when the same call was made before
    pub async fn fetch_with_cache<T, P>(&self, endpoint: Endpoint, params: &P) -> CoreResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params)?;
        let key = cache_key(endpoint, &params);

        let cached = self.cache.read().unwrap().get(&key).cloned();
        if let Some(value) = cached {
            log::debug!("Cache hit for {}", key);
            return decode(endpoint, value);
        }

        let value = self.wrapped_request(endpoint, params).await?;
        let result = decode(endpoint, value.clone())?;
        self.cache.write().unwrap().insert(key, value);
        Ok(result)
    }

    /// Call `endpoint` unconditionally; the response is not cached
    pub async fn fetch_without_cache<T, P>(&self, endpoint: Endpoint, params: &P) -> CoreResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let params = serde_json::to_value(params)?;
        let value = self.wrapped_request(endpoint, params).await?;
        decode(endpoint, value)
    }

    async fn wrapped_request(&self, endpoint: Endpoint, params: serde_json::Value) -> CoreResult<serde_json::Value> {
        let _guard = InFlight::enter(&self.in_flight);
        log::debug!("Calling {} with {}", endpoint, params);
        self.transport.call(endpoint, params).await
    }

    /// True while any remote call issued through this adapter is outstanding
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn clear_cache(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Drop cached responses for the given endpoints only
    pub fn clear_cache_by_endpoint(&self, endpoints: &[Endpoint]) {
        let prefixes: Vec<String> = endpoints.iter().map(|e| format!("{}@", e)).collect();
        let mut cache = self.cache.write().unwrap();
        let before = cache.len();
        cache.retain(|key, _| !prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())));
        log::debug!("Cleared {} cached responses", before - cache.len());
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.cache.read().unwrap().len()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Employee, RequestByEmployeeParams};
    use crate::testing::ScriptedTransport;

    fn fetch_with(transport: &Arc<ScriptedTransport>) -> CustomFetch {
        CustomFetch::new(transport.clone())
    }

    #[tokio::test]
    async fn test_cached_call_hits_remote_once() {
        let transport = Arc::new(ScriptedTransport::new().with_employees(vec![
            Employee::new("e1", "Ada", "Lovelace"),
        ]));
        let fetch = fetch_with(&transport);

        let first: Vec<Employee> = fetch.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        let second: Vec<Employee> = fetch.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(Endpoint::Employees), 1);
        assert_eq!(fetch.cached_len(), 1);
    }

    #[tokio::test]
    async fn test_cache_key_includes_params() {
        let transport = Arc::new(ScriptedTransport::new());
        let fetch = fetch_with(&transport);

        for id in ["e1", "e2", "e1"] {
            let params = RequestByEmployeeParams { employee_id: id.to_string() };
            let _: Vec<crate::models::Transaction> = fetch
                .fetch_with_cache(Endpoint::TransactionsByEmployee, &params)
                .await
                .unwrap();
        }

        assert_eq!(transport.call_count(Endpoint::TransactionsByEmployee), 2);
    }

    #[tokio::test]
    async fn test_uncached_call_always_hits_remote() {
        let transport = Arc::new(ScriptedTransport::new());
        let fetch = fetch_with(&transport);

        for _ in 0..3 {
            let _: Vec<Employee> = fetch.fetch_without_cache(Endpoint::Employees, &()).await.unwrap();
        }

        assert_eq!(transport.call_count(Endpoint::Employees), 3);
        assert_eq!(fetch.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_failed_call_is_not_cached() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.fail(Endpoint::Employees, true);
        let fetch = fetch_with(&transport);

        let result: CoreResult<Vec<Employee>> = fetch.fetch_with_cache(Endpoint::Employees, &()).await;
        assert!(matches!(result, Err(CoreError::Transport { .. })));
        assert!(!fetch.loading());

        transport.fail(Endpoint::Employees, false);
        let result: CoreResult<Vec<Employee>> = fetch.fetch_with_cache(Endpoint::Employees, &()).await;
        assert!(result.is_ok());
        assert_eq!(transport.call_count(Endpoint::Employees), 2);
    }

    #[tokio::test]
    async fn test_decode_error_reports_endpoint() {
        let transport = Arc::new(ScriptedTransport::new());
        let fetch = fetch_with(&transport);

        let result: CoreResult<u32> = fetch.fetch_with_cache(Endpoint::Employees, &()).await;
        match result {
            Err(CoreError::Decode { endpoint, .. }) => assert_eq!(endpoint, "employees"),
            other => panic!("expected decode error, got {:?}", other),
        }
        assert_eq!(fetch.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_clear_cache_by_endpoint() {
        let transport = Arc::new(ScriptedTransport::new());
        let fetch = fetch_with(&transport);

        let _: Vec<Employee> = fetch.fetch_with_cache(Endpoint::Employees, &()).await.unwrap();
        let params = RequestByEmployeeParams { employee_id: "e1".to_string() };
        let _: Vec<crate::models::Transaction> = fetch
            .fetch_with_cache(Endpoint::TransactionsByEmployee, &params)
            .await
            .unwrap();
        assert_eq!(fetch.cached_len(), 2);

        fetch.clear_cache_by_endpoint(&[Endpoint::TransactionsByEmployee]);
        assert_eq!(fetch.cached_len(), 1);

        fetch.clear_cache();
        assert_eq!(fetch.cached_len(), 0);
    }
}
