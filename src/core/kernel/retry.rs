use crate::core::errors::ExchangeError;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::{debug, warn};

/// Which failures re-enter the backoff loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    /// Every failure, including exchange rejections
    #[default]
    Blind,
    /// Only transient transport failures (timeouts, connection errors, 5xx, 408, 429)
    Transient,
}

/// Retry schedule for one logical call.
///
/// The delay before retry `k` (1-based) is `base_delay * k^exponent`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub exponent: f64,
    pub mode: RetryMode,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base_delay: Duration::from_secs(1),
            exponent: 1.5,
            mode: RetryMode::Blind,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.base_delay.mul_f64(f64::from(retry).powf(self.exponent))
    }

    /// Delays before retries 1..=max_retries
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let policy = self.clone();
        (1..=self.max_retries).map(move |k| policy.delay_for_retry(k))
    }

    pub fn should_retry(&self, error: &ExchangeError) -> bool {
        match self.mode {
            RetryMode::Blind => true,
            RetryMode::Transient => error.is_retryable(),
        }
    }

    /// Upper bound on time spent sleeping between attempts
    pub fn total_backoff(&self) -> Duration {
        self.delays().sum()
    }
}

/// Run `action` under `policy`.
///
/// `action` is invoked once per attempt and must rebuild everything that is
/// time-sensitive (timestamps, signatures). The last error is returned
/// unchanged once retries are exhausted or the error is not retryable.
pub async fn run<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut action: F,
) -> Result<T, ExchangeError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ExchangeError>>,
{
    let attempt = AtomicU32::new(0);

    RetryIf::spawn(
        policy.delays(),
        || {
            let current = attempt.fetch_add(1, Ordering::Relaxed) + 1;
            if current > 1 {
                debug!(operation, attempt = current, "retrying request");
            }
            action(current)
        },
        |error: &ExchangeError| {
            let failed = attempt.load(Ordering::Relaxed);
            if failed > policy.max_retries || !policy.should_retry(error) {
                return false;
            }
            warn!(
                operation,
                attempt = failed,
                delay_ms = policy.delay_for_retry(failed).as_millis() as u64,
                error = %error,
                "request failed, backing off"
            );
            true
        },
    )
    .await
}
