//! Module producing short tokens that are unique over time, used to build reference numbers

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::{Error, precondition_error};

/// Width of a token in characters
pub const TOKEN_WIDTH: usize = 6;

/// Minimum delay between two samples of the clock. Tokens have a resolution of one second.
pub const TOKEN_INTERVAL: Duration = Duration::from_secs(2);

const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A source of distinct reference-number tokens
pub trait TokenSource {
    fn next_token(&mut self) -> Result<String, Error>;
}

/// The time source sampled by [`UniqueTokenGenerator`]
pub trait Clock {
    /// Seconds since the Unix epoch
    fn epoch_seconds(&self) -> u64;

    fn pause(&self, duration: Duration);
}

/// The wall clock; pausing blocks the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn epoch_seconds(&self) -> u64 {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        // round to the nearest second
        (elapsed + Duration::from_millis(500)).as_secs()
    }

    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Encodes the current time in base 32 after waiting [`TOKEN_INTERVAL`], so two successive
/// tokens never share the same second.
#[derive(Debug, Default)]
pub struct UniqueTokenGenerator<C = SystemClock> {
    clock: C,
}

impl UniqueTokenGenerator<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> UniqueTokenGenerator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> TokenSource for UniqueTokenGenerator<C> {
    fn next_token(&mut self) -> Result<String, Error> {
        self.clock.pause(TOKEN_INTERVAL);
        let seconds = self.clock.epoch_seconds();
        let encoded = int_to_str(seconds, 32).map_err(precondition_error)?;

        let start = encoded.len().saturating_sub(TOKEN_WIDTH);
        let token = format!("{:0>width$}", &encoded[start..], width = TOKEN_WIDTH);
        debug!(seconds, token = %token, "minted token");
        Ok(token)
    }
}

/// Converts a positive integer to its digits in `base` (lowercase letters above 9)
pub fn int_to_str(value: u64, base: u32) -> Result<String, String> {
    if value == 0 {
        return Err("value must be greater than zero, not 0".to_string());
    }
    if base < 2 {
        return Err(format!("base must be greater than 1, not {base}"));
    }
    if base as usize > DIGITS.len() {
        return Err(format!("base is too large for the digits available: {base}"));
    }

    let base = u64::from(base);
    let mut remaining = value;
    let mut digits = Vec::new();
    while remaining > 0 {
        digits.push(DIGITS[(remaining % base) as usize]);
        remaining /= base;
    }
    digits.reverse();
    Ok(digits.into_iter().map(char::from).collect())
}

/// Inverse of `int_to_str(_, 32)`
pub fn decode_base32(token: &str) -> Result<u64, String> {
    token.chars().try_fold(0u64, |acc, c| {
        let digit = c
            .to_digit(32)
            .ok_or_else(|| format!("invalid base-32 digit '{c}' in {token}"))?;
        acc.checked_mul(32)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| format!("token {token} overflows"))
    })
}
