//! Request deduplication: collapse concurrent identical in-flight calls

use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Ensures only one request with a given key is executed at a time;
/// concurrent callers with the same key wait for and share the result.
///
/// Used to stop a retried `submit_response` HTTP call from double-charging
/// the LLM provider while the first evaluation is still in flight.
pub struct RequestDeduplicator {
    pending: Arc<RwLock<HashMap<String, Arc<Mutex<Option<Result<String, String>>>>>>>,
}

impl RequestDeduplicator {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn deduplicate<F, Fut>(&self, key: String, f: F) -> Result<String, String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, String>>,
    {
        let result_lock = {
            let mut pending = self.pending.write().await;

            if let Some(existing) = pending.get(&key) {
                tracing::debug!(key = %key, "deduplicating: waiting for in-flight request");
                existing.clone()
            } else {
                tracing::debug!(key = %key, "deduplicating: new request");
                let lock = Arc::new(Mutex::new(None));
                pending.insert(key.clone(), lock.clone());
                lock
            }
        };

        let mut result_guard = result_lock.lock().await;

        if let Some(result) = result_guard.as_ref() {
            tracing::debug!(key = %key, "deduplicating: using cached result");
            return result.clone();
        }

        let result = f().await;
        *result_guard = Some(result.clone());

        let mut pending = self.pending.write().await;
        pending.remove(&key);

        result
    }

    pub async fn clear(&self) {
        let mut pending = self.pending.write().await;
        pending.clear();
    }
}

impl Default for RequestDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn concurrent_same_key_executes_once() {
        let dedup = Arc::new(RequestDeduplicator::new());
        let counter = Arc::new(AtomicU32::new(0));
        let key = "interview-1:question-2".to_string();

        let mut handles = vec![];
        for _ in 0..5 {
            let dedup_clone = dedup.clone();
            let counter_clone = counter.clone();
            let key_clone = key.clone();

            handles.push(tokio::spawn(async move {
                dedup_clone
                    .deduplicate(key_clone, || async {
                        counter_clone.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
                        Ok("result".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert!(result.is_ok());
            assert_eq!(result.unwrap(), "result");
        }

        assert!(counter.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn different_keys_execute_independently() {
        let dedup = Arc::new(RequestDeduplicator::new());
        let counter = Arc::new(AtomicU32::new(0));

        let mut handles = vec![];
        for i in 0..3 {
            let dedup_clone = dedup.clone();
            let counter_clone = counter.clone();
            let key = format!("key-{}", i);

            handles.push(tokio::spawn(async move {
                dedup_clone
                    .deduplicate(key, || async {
                        counter_clone.fetch_add(1, Ordering::SeqCst);
                        Ok(format!("result-{}", i))
                    })
                    .await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
