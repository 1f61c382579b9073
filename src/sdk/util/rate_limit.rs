use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Documented ceiling of the ORS free tier for directions.
pub const ORS_REQUESTS_PER_MINUTE: u32 = 40;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Gap between two consecutive calls that keeps a strictly sequential caller
/// at or under `requests_per_minute` (40/min gives 1500 ms). Rounded up to
/// the next nanosecond.
pub fn pacing_delay(requests_per_minute: NonZeroU32) -> Duration {
    let minute = Duration::from_secs(60).as_nanos();
    let n = u128::from(requests_per_minute.get());
    let nanos = (minute + n - 1) / n;
    Duration::from_nanos(nanos as u64)
}

/// Process-wide guard for one provider: one request per pacing period, no
/// burst, so callers sharing the provider still stay under the ceiling.
pub fn ors_limiter(requests_per_minute: NonZeroU32) -> Limiter {
    let quota = Quota::with_period(pacing_delay(requests_per_minute))
        .unwrap_or_else(|| Quota::per_minute(requests_per_minute))
        .allow_burst(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(quota))
}
