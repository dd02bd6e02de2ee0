use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Fixed minimum interval between requests
///
/// StartReadSetImportJob is limited to 5 requests per second, so the default interval is 200 ms.
/// The interval is measured between the starts of consecutive requests. The first request never
/// waits.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Pacer {
        Pacer { interval, last: None }
    }

    /// Wait until the next request may be sent
    pub async fn ready(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.interval).await;
        }
        self.last = Some(Instant::now());
    }
}
