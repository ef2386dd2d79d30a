use std::time::Instant;

/// Exchange time for the duration of one webhook request.
///
/// Anchored on the server time fetched at the start of the request; signed
/// calls read `now_ms` so a skewed local clock never leaks into a signature.
#[derive(Debug, Clone, Copy)]
pub struct RequestClock {
    server_time_ms: u64,
    anchored_at: Instant,
}

impl RequestClock {
    pub fn anchored(server_time_ms: u64) -> Self {
        Self {
            server_time_ms,
            anchored_at: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.server_time_ms + self.anchored_at.elapsed().as_millis() as u64
    }
}
