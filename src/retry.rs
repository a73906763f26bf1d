//! Retry policies and the retry executor.
//!
//! A [`RetryPolicy`] bundles the attempt cap, the per-attempt timeout, the backoff
//! schedule, the predicate that classifies failures, and an optional overall deadline.
//! [`execute`] drives one logical call through that policy and honours a
//! [`CancellationToken`] at every suspension point.

use crate::Error;
use http::{HeaderMap, StatusCode};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio_util::sync::CancellationToken;

const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);
const RETRY_TOKEN_LENGTH: usize = 30;

/// The delay schedule between attempts.
///
/// # Examples
///
/// ```
/// use coreservices::Backoff;
/// use std::time::Duration;
///
/// // 100ms, 200ms, 400ms... capped at 5s
/// let exponential = Backoff::Exponential {
///     initial: Duration::from_millis(100),
///     max: Duration::from_secs(5),
///     jitter: false,
/// };
/// assert_eq!(exponential.delay_for_attempt(3), Duration::from_millis(400));
///
/// let custom = Backoff::custom(|attempt| Duration::from_millis(10 * attempt as u64));
/// assert_eq!(custom.delay_for_attempt(2), Duration::from_millis(20));
/// ```
#[derive(Clone)]
pub enum Backoff {
    /// `initial * 2^(attempt - 1)`, capped at `max`.
    ///
    /// With jitter the delay is drawn between 50% and 100% of that value.
    Exponential {
        initial: Duration,
        max: Duration,
        jitter: bool,
    },

    /// The same delay after every attempt.
    Fixed(Duration),

    /// A caller-supplied schedule keyed by the attempt that just failed (1-indexed).
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Backoff {
    pub fn custom(schedule: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        Backoff::Custom(Arc::new(schedule))
    }

    /// Returns the delay to wait after the given failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Exponential { initial, max, jitter } => {
                let multiplier = 2u32.saturating_pow(attempt.saturating_sub(1));
                let delay = initial.saturating_mul(multiplier).min(*max);

                if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    delay.mul_f64(jitter_factor)
                } else {
                    delay
                }
            }
            Backoff::Fixed(delay) => *delay,
            Backoff::Custom(schedule) => schedule(attempt),
        }
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backoff::Exponential { initial, max, jitter } => f
                .debug_struct("Exponential")
                .field("initial", initial)
                .field("max", max)
                .field("jitter", jitter)
                .finish(),
            Backoff::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Backoff::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Decides whether a failed attempt should be retried.
///
/// Closures with the same signature implement this trait.
///
/// # Examples
///
/// ```
/// use coreservices::{Error, RetryPredicate};
///
/// struct RetryOnThrottle;
///
/// impl RetryPredicate for RetryOnThrottle {
///     fn should_retry(&self, error: &Error, _attempt: u32) -> bool {
///         error.status().map_or(false, |s| s.as_u16() == 429)
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &Error, attempt: u32) -> bool;
}

impl<F> RetryPredicate for F
where
    F: Fn(&Error, u32) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        self(error, attempt)
    }
}

/// Retries every error for which [`Error::is_retryable`] holds.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: u32) -> bool {
        error.is_retryable()
    }
}

/// Never retries.
#[derive(Debug, Clone, Copy)]
pub struct NeverRetry;

impl RetryPredicate for NeverRetry {
    fn should_retry(&self, _error: &Error, _attempt: u32) -> bool {
        false
    }
}

/// Retries service errors with one of the listed statuses.
///
/// Combine with [`RetryOnRetryable`] through [`OrPredicate`] to, for example, also
/// retry 409 conflicts.
#[derive(Debug, Clone)]
pub struct RetryOnStatus {
    statuses: HashSet<StatusCode>,
}

impl RetryOnStatus {
    pub fn new(statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        Self {
            statuses: statuses.into_iter().collect(),
        }
    }
}

impl RetryPredicate for RetryOnStatus {
    fn should_retry(&self, error: &Error, _attempt: u32) -> bool {
        matches!(error, Error::Service(failure) if self.statuses.contains(&failure.status))
    }
}

/// Retries if ANY of the predicates says so.
pub struct OrPredicate {
    predicates: Vec<Arc<dyn RetryPredicate>>,
}

impl OrPredicate {
    pub fn new(predicates: Vec<Arc<dyn RetryPredicate>>) -> Self {
        Self { predicates }
    }
}

impl RetryPredicate for OrPredicate {
    fn should_retry(&self, error: &Error, attempt: u32) -> bool {
        self.predicates.iter().any(|p| p.should_retry(error, attempt))
    }
}

/// How one logical call is retried.
///
/// # Examples
///
/// ```
/// use coreservices::{Backoff, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(3)
///     .backoff(Backoff::Fixed(Duration::from_millis(250)))
///     .attempt_timeout(Duration::from_secs(10))
///     .deadline(Duration::from_secs(30))
///     .build();
/// assert_eq!(policy.max_attempts, 3);
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Values below 1 behave as 1.
    pub max_attempts: u32,

    /// Upper bound for a single attempt, from send to fully read body.
    pub attempt_timeout: Duration,

    pub backoff: Backoff,

    pub predicate: Arc<dyn RetryPredicate>,

    /// Overall budget measured from the first attempt. A backoff that would cross it
    /// ends the call with [`Error::DeadlineExceeded`].
    pub deadline: Option<Duration>,

    /// When set, a `Retry-After` header on a 429 or 503 lengthens the backoff, up to this cap.
    pub retry_after_cap: Option<Duration>,
}

impl RetryPolicy {
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// A single attempt. Failures surface unchanged.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            backoff: Backoff::Fixed(Duration::ZERO),
            predicate: Arc::new(NeverRetry),
            deadline: None,
            retry_after_cap: None,
        }
    }

    /// The delay after `attempt` failed with `error`.
    pub fn delay_after(&self, error: &Error, attempt: u32) -> Duration {
        let delay = self.backoff.delay_for_attempt(attempt);
        let Some(cap) = self.retry_after_cap else {
            return delay;
        };
        let hint = match error {
            Error::Service(failure)
                if matches!(
                    failure.status,
                    StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
                ) =>
            {
                parse_retry_after(&failure.raw.headers)
            }
            _ => None,
        };
        match hint {
            Some(hint) => delay.max(hint.min(cap)),
            None => delay,
        }
    }
}

/// Eight attempts, exponential backoff from one second capped at 30 seconds with
/// jitter, retrying whatever [`Error::is_retryable`] accepts.
impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            backoff: Backoff::Exponential {
                initial: Duration::from_secs(1),
                max: Duration::from_secs(30),
                jitter: true,
            },
            predicate: Arc::new(RetryOnRetryable),
            deadline: None,
            retry_after_cap: Some(Duration::from_secs(30)),
        }
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("backoff", &self.backoff)
            .field("deadline", &self.deadline)
            .field("retry_after_cap", &self.retry_after_cap)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RetryPolicy`]. Unset options take the [`RetryPolicy::default`] values.
#[derive(Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    attempt_timeout: Option<Duration>,
    backoff: Option<Backoff>,
    predicate: Option<Arc<dyn RetryPredicate>>,
    deadline: Option<Duration>,
    retry_after_cap: Option<Option<Duration>>,
}

impl RetryPolicyBuilder {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = Some(backoff);
        self
    }

    pub fn predicate(mut self, predicate: impl RetryPredicate + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Caps how long a `Retry-After` hint may stretch a backoff. `None` ignores the header.
    pub fn retry_after_cap(mut self, cap: Option<Duration>) -> Self {
        self.retry_after_cap = Some(cap);
        self
    }

    pub fn build(self) -> RetryPolicy {
        let default = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(default.max_attempts),
            attempt_timeout: self.attempt_timeout.unwrap_or(default.attempt_timeout),
            backoff: self.backoff.unwrap_or(default.backoff),
            predicate: self.predicate.unwrap_or(default.predicate),
            deadline: self.deadline.or(default.deadline),
            retry_after_cap: self.retry_after_cap.unwrap_or(default.retry_after_cap),
        }
    }
}

/// Generates a fresh idempotency token.
pub fn retry_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RETRY_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Parses `Retry-After` as delay-seconds or an HTTP date.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get("retry-after")?.to_str().ok()?.trim();

    if let Ok(seconds) = header.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = httpdate::parse_http_date(header).ok()?;
    Some(at.duration_since(SystemTime::now()).unwrap_or(Duration::ZERO))
}

/// Runs `attempt_fn` under `policy` until it succeeds, fails for good, or is cancelled.
///
/// `attempt_fn` receives the 1-indexed attempt number. Each attempt is bounded by the
/// policy's attempt timeout. Cancellation is checked while an attempt is in flight,
/// before classifying its outcome, and while backing off, and always wins over a
/// retryable failure.
///
/// Outcomes:
/// - the predicate declines: the attempt's error is returned unchanged;
/// - the predicate accepts but no attempts are left: [`Error::RetryExhausted`];
/// - the backoff would cross the deadline: [`Error::DeadlineExceeded`].
pub async fn execute<T, F, Fut>(
    cancel: &CancellationToken,
    policy: &RetryPolicy,
    mut attempt_fn: F,
) -> crate::Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = crate::Result<T>>,
{
    let started = Instant::now();
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let attempt_future = tokio::time::timeout(policy.attempt_timeout, attempt_fn(attempt));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = attempt_future => match result {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::Timeout(policy.attempt_timeout)),
            },
        };

        let error = match outcome {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt = attempt, "Request succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if !policy.predicate.should_retry(&error, attempt) {
            return Err(error);
        }

        if attempt >= max_attempts {
            tracing::warn!(attempts = attempt, error = %error, "Retries exhausted");
            return Err(Error::RetryExhausted {
                attempts: attempt,
                last_error: Box::new(error),
            });
        }

        let delay = policy.delay_after(&error, attempt);
        if let Some(deadline) = policy.deadline {
            if started.elapsed() + delay > deadline {
                tracing::warn!(
                    attempt = attempt,
                    deadline_ms = deadline.as_millis() as u64,
                    "Retry deadline would be exceeded, giving up"
                );
                return Err(Error::DeadlineExceeded {
                    deadline,
                    last_error: Box::new(error),
                });
            }
        }

        tracing::warn!(
            attempt = attempt,
            max_attempts = max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Attempt failed, retrying after delay"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::response::RawResponse;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn service_error(status: u16, retry_after: Option<&'static str>) -> Error {
        let mut headers = HeaderMap::new();
        if let Some(value) = retry_after {
            headers.insert("retry-after", value.parse().unwrap());
        }
        ServiceError::from_raw(RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            url::Url::parse("http://localhost/").unwrap(),
            Vec::new(),
        ))
        .into()
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::builder()
            .max_attempts(max_attempts)
            .backoff(Backoff::Fixed(Duration::from_millis(1)))
            .build()
    }

    #[test]
    fn test_exponential_backoff_delays() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            jitter: false,
        };

        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(4), Duration::from_millis(800));
        assert_eq!(backoff.delay_for_attempt(5), Duration::from_secs(1));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_secs(1));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_secs(1),
            jitter: true,
        };
        for _ in 0..50 {
            let delay = backoff.delay_for_attempt(1);
            assert!(delay >= Duration::from_millis(50) && delay <= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_retry_after_stretches_backoff_up_to_cap() {
        let policy = RetryPolicy::builder()
            .backoff(Backoff::Fixed(Duration::from_millis(10)))
            .retry_after_cap(Some(Duration::from_secs(5)))
            .build();

        let fixed = Duration::from_millis(10);
        assert_eq!(policy.delay_after(&service_error(429, Some("2")), 1), Duration::from_secs(2));
        assert_eq!(policy.delay_after(&service_error(503, Some("60")), 1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(&service_error(500, Some("2")), 1), fixed);
        assert_eq!(policy.delay_after(&service_error(429, None), 1), fixed);

        let ignoring = RetryPolicy::builder()
            .backoff(Backoff::Fixed(Duration::from_millis(10)))
            .retry_after_cap(None)
            .build();
        assert_eq!(ignoring.delay_after(&service_error(429, Some("2")), 1), fixed);
    }

    #[test]
    fn test_retry_after_http_date_in_past_is_zero() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(Duration::ZERO));
    }

    #[test]
    fn test_predicates() {
        let conflict = service_error(409, None);
        assert!(!RetryOnRetryable.should_retry(&conflict, 1));

        let either = OrPredicate::new(vec![
            Arc::new(RetryOnRetryable) as Arc<dyn RetryPredicate>,
            Arc::new(RetryOnStatus::new([StatusCode::CONFLICT])),
        ]);
        assert!(either.should_retry(&conflict, 1));
        assert!(either.should_retry(&service_error(503, None), 1));
        assert!(!either.should_retry(&service_error(400, None), 1));
        assert!(!NeverRetry.should_retry(&service_error(503, None), 1));
    }

    #[test]
    fn test_retry_token_shape() {
        let token = retry_token();
        assert_eq!(token.len(), RETRY_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, retry_token());
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = execute(&CancellationToken::new(), &fast_policy(3), |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 3 {
                    Err(service_error(503, None))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_is_returned_unchanged() {
        let calls = AtomicU32::new(0);
        let result: crate::Result<()> = execute(&CancellationToken::new(), &fast_policy(5), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(service_error(404, None)) }
        })
        .await;

        assert!(matches!(result, Err(Error::Service(ref f)) if f.status == StatusCode::NOT_FOUND));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy_exhausts_immediately() {
        let calls = AtomicU32::new(0);
        let result: crate::Result<()> = execute(&CancellationToken::new(), &fast_policy(1), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(service_error(503, None)) }
        })
        .await;

        assert!(matches!(result, Err(Error::RetryExhausted { attempts: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_retry_policy_surfaces_raw_error() {
        let result: crate::Result<()> =
            execute(&CancellationToken::new(), &RetryPolicy::no_retry(), |_| async {
                Err(service_error(503, None))
            })
            .await;

        assert!(matches!(result, Err(Error::Service(_))));
    }

    #[tokio::test]
    async fn test_attempt_timeout() {
        let policy = RetryPolicy::builder()
            .max_attempts(2)
            .attempt_timeout(Duration::from_millis(20))
            .backoff(Backoff::Fixed(Duration::from_millis(1)))
            .build();

        let result: crate::Result<()> = execute(&CancellationToken::new(), &policy, |_| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        match result {
            Err(Error::RetryExhausted { attempts, last_error }) => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last_error, Error::Timeout(_)));
            }
            other => panic!("expected exhausted timeouts, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deadline_stops_before_long_backoff() {
        let policy = RetryPolicy::builder()
            .max_attempts(5)
            .backoff(Backoff::Fixed(Duration::from_secs(10)))
            .deadline(Duration::from_secs(1))
            .build();

        let started = Instant::now();
        let result: crate::Result<()> = execute(&CancellationToken::new(), &policy, |_| async {
            Err(service_error(500, None))
        })
        .await;

        assert!(matches!(result, Err(Error::DeadlineExceeded { .. })));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_attempt_cap_wins_over_deadline() {
        let policy = RetryPolicy::builder()
            .max_attempts(1)
            .backoff(Backoff::Fixed(Duration::from_secs(10)))
            .deadline(Duration::from_secs(1))
            .build();

        let result: crate::Result<()> = execute(&CancellationToken::new(), &policy, |_| async {
            Err(service_error(500, None))
        })
        .await;

        assert!(matches!(result, Err(Error::RetryExhausted { .. })));
    }

    #[tokio::test]
    async fn test_cancel_during_backoff() {
        let cancel = CancellationToken::new();
        let policy = RetryPolicy::builder()
            .max_attempts(5)
            .backoff(Backoff::Fixed(Duration::from_secs(10)))
            .build();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let calls = AtomicU32::new(0);
        let started = Instant::now();
        let result: crate::Result<()> = execute(&cancel, &policy, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(service_error(503, None)) }
        })
        .await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_runs() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let calls = AtomicU32::new(0);
        let bodies_run = AtomicU32::new(0);
        let result: crate::Result<()> = execute(&cancel, &fast_policy(3), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            let bodies_run = &bodies_run;
            async move {
                bodies_run.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(bodies_run.load(Ordering::SeqCst), 0);
    }
}
