use super::error::ApiError;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Buckets idle for longer than this are dropped by `cleanup`.
const IDLE_BUCKET: Duration = Duration::from_secs(300);

/// The server-wide bucket is this many times larger than a per-IP one.
const GLOBAL_FACTOR: f64 = 10.0;

/// Token bucket that knows its own capacity and refill rate.
#[derive(Debug, Clone)]
struct Bucket {
    capacity: f64,
    refill_per_sec: f64,
    available: f64,
    touched: Instant,
}

impl Bucket {
    fn full(capacity: f64, refill_per_sec: f64, now: Instant) -> Self {
        Self {
            capacity,
            refill_per_sec,
            available: capacity,
            touched: now,
        }
    }

    fn take(&mut self, now: Instant) -> bool {
        let idle = now.saturating_duration_since(self.touched).as_secs_f64();
        self.available = self.capacity.min(self.available + idle * self.refill_per_sec);
        self.touched = now;

        let granted = self.available >= 1.0;
        if granted {
            self.available -= 1.0;
        }
        granted
    }

    fn is_idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.touched) >= IDLE_BUCKET
    }
}

/// Per-IP token buckets behind one server-wide bucket.
pub struct ApiRateLimiter {
    per_ip_capacity: f64,
    per_ip_refill: f64,
    per_ip: Mutex<HashMap<IpAddr, Bucket>>,
    global: Mutex<Bucket>,
}

impl ApiRateLimiter {
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        let capacity = f64::from(burst_size);
        let refill = f64::from(requests_per_second);
        Self {
            per_ip_capacity: capacity,
            per_ip_refill: refill,
            per_ip: Mutex::new(HashMap::new()),
            global: Mutex::new(Bucket::full(
                capacity * GLOBAL_FACTOR,
                refill * GLOBAL_FACTOR,
                Instant::now(),
            )),
        }
    }

    pub fn check_request(&self, ip: IpAddr) -> RateLimitResult {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> RateLimitResult {
        if !self.global.lock().take(now) {
            return RateLimitResult::GlobalLimitExceeded;
        }

        let mut per_ip = self.per_ip.lock();
        let bucket = per_ip
            .entry(ip)
            .or_insert_with(|| Bucket::full(self.per_ip_capacity, self.per_ip_refill, now));
        if bucket.take(now) {
            RateLimitResult::Allowed
        } else {
            RateLimitResult::IpLimitExceeded
        }
    }

    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut per_ip = self.per_ip.lock();
        let before = per_ip.len();
        per_ip.retain(|_, bucket| !bucket.is_idle(now));
        let dropped = before - per_ip.len();
        if dropped > 0 {
            debug!(dropped, "Dropped idle rate-limit buckets");
        }
    }

    pub fn stats(&self) -> RateLimiterStats {
        RateLimiterStats {
            tracked_ips: self.per_ip.lock().len(),
            global_tokens_available: self.global.lock().available as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed,
    IpLimitExceeded,
    GlobalLimitExceeded,
}

#[derive(Debug, Clone)]
pub struct RateLimiterStats {
    pub tracked_ips: usize,
    pub global_tokens_available: u32,
}

/// Rejects requests over the limit with 429.
///
/// The peer address comes from `ConnectInfo`; requests without one (in-process
/// callers) share the unspecified-address bucket.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<ApiRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check_request(ip) {
        RateLimitResult::Allowed => next.run(request).await,
        result => {
            debug!(%ip, ?result, "Request rate limited");
            ApiError::RateLimited.into_response()
        }
    }
}
