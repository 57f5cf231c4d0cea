use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use teloxide::types::ChatId;

use crate::config::Config;
use crate::error::FloodError;
use crate::event::{Classify, InboundEvent};
use crate::rate_limiter::{Decision, RateLimiter};
use crate::utils::{Notifier, FLOOD_WARNING};

/// Source of "now" in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<f64, FloodError>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<f64, FloodError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .map_err(|e| FloodError::Clock(e.to_string()))
    }
}

/// Outcome of evaluating one event.
#[derive(Debug)]
pub enum Verdict {
    Allow,
    Reject {
        user_id: u64,
        reply_to: Option<ChatId>,
    },
    InternalFault(FloodError),
}

impl Verdict {
    /// Whether the event goes on to the downstream handler. Faults fail open.
    pub fn forwards(&self) -> bool {
        match self {
            Verdict::Allow | Verdict::InternalFault(_) => true,
            Verdict::Reject { .. } => false,
        }
    }
}

/// Per-user flood gate placed in front of the update handlers.
pub struct AntiFlood<N> {
    limiter: Mutex<RateLimiter>,
    notifier: N,
    clock: Arc<dyn Clock>,
    notify_timeout: Duration,
}

impl<N: Notifier + Sync> AntiFlood<N> {
    pub fn new(config: Config, notifier: N) -> Self {
        log::info!(
            "Initialized AntiFlood with limit={}/per {}s",
            config.limit,
            config.interval
        );
        Self {
            limiter: Mutex::new(RateLimiter::new(config.limit, config.interval)),
            notifier,
            clock: Arc::new(SystemClock),
            notify_timeout: config.notify_timeout,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Classifies the event and, for messages, records it against the sender.
    pub fn evaluate<E: Classify>(&self, event: &E) -> Verdict {
        match self.try_evaluate(event) {
            Ok(verdict) => verdict,
            Err(e) => Verdict::InternalFault(e),
        }
    }

    fn try_evaluate<E: Classify>(&self, event: &E) -> Result<Verdict, FloodError> {
        let (user_id, reply_to) = match event.classify()? {
            InboundEvent::Message { user_id, reply_to } => (user_id, reply_to),
            InboundEvent::Unsupported => {
                log::debug!("Unsupported event type, skipping flood check");
                return Ok(Verdict::Allow);
            }
        };
        let now = self.clock.now()?;
        let mut limiter = self.limiter.lock().map_err(|_| FloodError::Poisoned)?;
        match limiter.check_and_record(user_id, now) {
            Decision::Allow => Ok(Verdict::Allow),
            Decision::Reject => {
                log::warn!(
                    "Flood detected from user {} ({} requests, limit {}/per {}s)",
                    user_id,
                    limiter.recent(user_id),
                    limiter.limit(),
                    limiter.interval()
                );
                Ok(Verdict::Reject { user_id, reply_to })
            }
        }
    }

    /// Decides whether the event may proceed, warning the sender on rejection.
    pub async fn admit<E: Classify>(&self, event: &E) -> bool {
        let verdict = self.evaluate(event);
        match &verdict {
            Verdict::Allow => {}
            Verdict::InternalFault(e) => {
                log::error!("Error in AntiFlood, forwarding event: {}", e);
            }
            Verdict::Reject { user_id, reply_to } => {
                if let Some(chat_id) = reply_to {
                    self.warn(*user_id, *chat_id).await;
                }
            }
        }
        verdict.forwards()
    }

    async fn warn(&self, user_id: u64, chat_id: ChatId) {
        let delivery = self.notifier.notify(chat_id, FLOOD_WARNING);
        match tokio::time::timeout(self.notify_timeout, delivery).await {
            Ok(Ok(())) => log::info!("Sent flood warning to user {}", user_id),
            Ok(Err(e)) => log::error!("Failed to send flood warning: {}", e),
            Err(_) => log::warn!(
                "Flood warning to user {} timed out after {:?}",
                user_id,
                self.notify_timeout
            ),
        }
    }

    /// Runs `handler` if the event is admitted and returns its result.
    /// `None` means the event was suppressed.
    pub async fn call<E, D, H, Fut, R>(&self, handler: H, event: E, data: D) -> Option<R>
    where
        E: Classify,
        H: FnOnce(E, D) -> Fut,
        Fut: Future<Output = R>,
    {
        if self.admit(&event).await {
            Some(handler(event, data).await)
        } else {
            None
        }
    }
}
