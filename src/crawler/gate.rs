//! Politeness gate: robots.txt checks and request spacing
//!
//! The gate enforces, for one sequential caller:
//! - robots.txt allow/deny for the crawler's product token
//! - a minimum interval between permitted requests, the larger of the
//!   configured delay and the site's declared Crawl-delay

use crate::crawler::clock::{Clock, SystemClock};
use crate::robots::{product_token, ParsedRobots};
use std::time::{Duration, Instant};

/// Gate deciding whether and when the next request may go out
#[derive(Debug)]
pub struct PolitenessGate<C: Clock = SystemClock> {
    robots: ParsedRobots,
    agent_token: String,
    min_interval: Duration,
    last_request_time: Option<Instant>,
    clock: C,
}

impl<C: Clock> PolitenessGate<C> {
    /// Creates a gate
    ///
    /// # Arguments
    ///
    /// * `robots` - The site's robots policy, loaded before crawling
    /// * `user_agent` - Full User-Agent value; its product token is used for matching
    /// * `configured_delay` - Minimum spacing between requests
    /// * `clock` - Time source
    pub fn new(
        robots: ParsedRobots,
        user_agent: &str,
        configured_delay: Duration,
        clock: C,
    ) -> Self {
        let declared = robots
            .crawl_delay(user_agent)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

        let min_interval = match declared {
            Some(declared) if declared > configured_delay => {
                tracing::info!(
                    "robots.txt declares a Crawl-delay of {:?}, longer than the configured {:?}",
                    declared,
                    configured_delay
                );
                declared
            }
            _ => configured_delay,
        };

        Self {
            robots,
            agent_token: product_token(user_agent).to_string(),
            min_interval,
            last_request_time: None,
            clock,
        }
    }

    /// Checks the robots policy for `url`
    pub fn can_fetch(&self, url: &str) -> bool {
        self.robots.is_allowed(url, &self.agent_token)
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next_request(&self) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = self.clock.now().saturating_duration_since(last);
        if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        }
    }

    /// Waits out the remaining interval, then records now as the last request
    pub async fn acquire(&mut self) {
        if let Some(wait) = self.time_until_next_request() {
            tracing::trace!("Waiting {:?} before the next request", wait);
            self.clock.sleep(wait).await;
        }
        self.last_request_time = Some(self.clock.now());
    }

    /// The enforced spacing between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// When the last permitted request was recorded, if any
    pub fn last_request_time(&self) -> Option<Instant> {
        self.last_request_time
    }

    /// The product token matched against robots.txt groups
    pub fn agent_token(&self) -> &str {
        &self.agent_token
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
