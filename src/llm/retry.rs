//! Exponential backoff retry policy for outbound LLM/STT requests

use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 10000,
        }
    }
}

impl RetryPolicy {
    /// Execute a function with retry logic, used for any op the caller
    /// considers retryable (network call, schema-validated LLM response).
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempts = 0;
        let mut delay = self.initial_delay_ms;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    attempts += 1;

                    if attempts >= self.max_retries {
                        tracing::error!("request failed after {} attempts: {}", attempts, err);
                        return Err(err);
                    }

                    tracing::warn!(
                        "request failed (attempt {}/{}): {}. retrying in {}ms",
                        attempts,
                        self.max_retries,
                        err,
                        delay
                    );

                    sleep(Duration::from_millis(delay)).await;

                    delay = ((delay as f64) * self.backoff_multiplier) as u64;
                    delay = delay.min(self.max_delay_ms);
                }
            }
        }
    }

    pub fn is_retryable(error: &anyhow::Error) -> bool {
        let error_str = error.to_string().to_lowercase();
        error_str.contains("timeout")
            || error_str.contains("connection")
            || error_str.contains("network")
            || error_str.contains("500")
            || error_str.contains("502")
            || error_str.contains("503")
            || error_str.contains("504")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retry_succeeds_on_second_attempt() {
        let policy = RetryPolicy::default();
        let mut attempt = 0;

        let result = policy
            .execute(|| {
                attempt += 1;
                let this_attempt = attempt;
                async move {
                    if this_attempt == 1 {
                        anyhow::bail!("first attempt fails")
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempt, 2);
    }

    #[tokio::test]
    async fn retry_exhausted_returns_error() {
        let policy = RetryPolicy {
            max_retries: 2,
            initial_delay_ms: 10,
            ..Default::default()
        };
        let mut attempt = 0;

        let result: Result<()> = policy
            .execute(|| {
                attempt += 1;
                async move { anyhow::bail!("always fails") }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(attempt, 2);
    }

    #[test]
    fn retryable_errors_are_recognised() {
        assert!(RetryPolicy::is_retryable(&anyhow::anyhow!("connection reset")));
        assert!(RetryPolicy::is_retryable(&anyhow::anyhow!("status 503")));
        assert!(!RetryPolicy::is_retryable(&anyhow::anyhow!("invalid json")));
    }
}
