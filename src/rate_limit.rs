use super::*;

/// Sliding-window limiter keyed by Telegram user id.
pub(crate) struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: Mutex<HashMap<u64, Vec<Instant>>>,
}

impl RateLimiter {
    pub(crate) fn new(max_requests: usize, window: Duration) -> Self {
        RateLimiter {
            max_requests,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn allow(&self, user_id: u64) -> bool {
        self.allow_at(user_id, Instant::now()).await
    }

    pub(crate) async fn allow_at(&self, user_id: u64, now: Instant) -> bool {
        let mut requests = self.requests.lock().await;
        let recent = requests.entry(user_id).or_default();
        recent.retain(|t| now.saturating_duration_since(*t) < self.window);
        if recent.len() >= self.max_requests {
            return false;
        }
        recent.push(now);
        true
    }

    pub(crate) async fn cleanup(&self) {
        self.cleanup_at(Instant::now()).await
    }

    pub(crate) async fn cleanup_at(&self, now: Instant) {
        let mut requests = self.requests.lock().await;
        requests.retain(|_, recent| {
            recent.retain(|t| now.saturating_duration_since(*t) < self.window);
            !recent.is_empty()
        });
    }

    pub(crate) async fn tracked_users(&self) -> usize {
        self.requests.lock().await.len()
    }
}

pub(crate) fn start_cleanup_loop(limiter: Arc<RateLimiter>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            interval.tick().await;
            limiter.cleanup().await;
            debug!("rate limiter tracking {} users", limiter.tracked_users().await);
        }
    });
}
