//! Wait mechanisms.
//!
//! Every wait in pagehand is a synchronous busy-poll: check, sleep for the
//! poll interval, check again, until the check succeeds or the timeout
//! elapses. The check always runs at least once, even with a zero timeout.

use crate::result::{HarnessError, HarnessResult};
use std::time::{Duration, Instant};

/// Default timeout for element resolution (5 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 5_000;

/// Default timeout for page assertions (20 seconds)
pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 20_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Trait for custom wait conditions
pub trait WaitCondition {
    /// Check if the condition is satisfied
    fn check(&mut self) -> HarnessResult<bool>;

    /// Get description for error messages
    fn description(&self) -> String;
}

/// A function-based wait condition
pub struct FnCondition<F> {
    func: F,
    description: String,
}

impl<F> std::fmt::Debug for FnCondition<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<F: FnMut() -> HarnessResult<bool>> FnCondition<F> {
    /// Create a new function condition
    pub fn new(func: F, description: impl Into<String>) -> Self {
        Self {
            func,
            description: description.into(),
        }
    }
}

impl<F: FnMut() -> HarnessResult<bool>> WaitCondition for FnCondition<F> {
    fn check(&mut self) -> HarnessResult<bool> {
        (self.func)()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll `check` until it yields a value or the timeout elapses.
///
/// Returns `Ok(None)` on timeout so callers can raise the failure that fits
/// their context. Errors from the check abort the wait immediately.
pub fn poll<T, F>(options: &WaitOptions, mut check: F) -> HarnessResult<Option<T>>
where
    F: FnMut() -> HarnessResult<Option<T>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let interval = options.poll_interval();

    loop {
        if let Some(value) = check()? {
            return Ok(Some(value));
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(None);
        }
        std::thread::sleep(interval.min(timeout - elapsed));
    }
}

/// Wait for a condition, failing with [`HarnessError::Timeout`]
pub fn wait_for<C: WaitCondition>(
    condition: &mut C,
    options: &WaitOptions,
) -> HarnessResult<WaitResult> {
    let start = Instant::now();
    let satisfied = poll(options, || Ok(condition.check()?.then_some(())))?;
    match satisfied {
        Some(()) => Ok(WaitResult {
            elapsed: start.elapsed(),
            waited_for: condition.description(),
        }),
        None => {
            tracing::warn!(
                timeout_ms = options.timeout_ms,
                condition = %condition.description(),
                "wait timed out"
            );
            Err(HarnessError::Timeout {
                ms: options.timeout_ms,
                waited_for: condition.description(),
            })
        }
    }
}

/// Wait until `predicate` returns true
pub fn wait_until<F>(
    predicate: F,
    description: impl Into<String>,
    options: &WaitOptions,
) -> HarnessResult<WaitResult>
where
    F: FnMut() -> HarnessResult<bool>,
{
    let mut condition = FnCondition::new(predicate, description);
    wait_for(&mut condition, options)
}
