//! Caching, de-duplicating front for a `RiddleGenerator`.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::seq::SliceRandom;
use riddle_core::difficulty::TierPolicy;
use riddle_core::model::{CHOICE_COUNT, RequestKey, Riddle};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::ai::{RiddleGenerator, RiddleRequest};
use crate::error::GenerationFailure;

type FetchResult = Result<Riddle, GenerationFailure>;

/// Order in which a riddle's choices are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOrder {
    AsGenerated,
    Shuffled,
}

enum Slot {
    Ready(Riddle),
    InFlight(watch::Receiver<Option<FetchResult>>),
}

enum Claim {
    Hit(Riddle),
    Join(watch::Receiver<Option<FetchResult>>),
    Lead(watch::Sender<Option<FetchResult>>),
}

/// Turns request keys into validated riddles.
///
/// Successful results are memoised per key for the lifetime of the source, and
/// concurrent fetches of one key share a single upstream call. Failures are
/// handed to every waiting caller and then forgotten, so a later fetch tries again.
pub struct RiddleSource {
    generator: Arc<dyn RiddleGenerator>,
    tiers: TierPolicy,
    timeout: Duration,
    choice_order: ChoiceOrder,
    slots: Mutex<HashMap<RequestKey, Slot>>,
    upstream_calls: AtomicU64,
}

impl RiddleSource {
    #[must_use]
    pub fn new(generator: Arc<dyn RiddleGenerator>) -> Self {
        Self {
            generator,
            tiers: TierPolicy::default(),
            timeout: Duration::from_secs(20),
            choice_order: ChoiceOrder::Shuffled,
            slots: Mutex::new(HashMap::new()),
            upstream_calls: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_tiers(mut self, tiers: TierPolicy) -> Self {
        self.tiers = tiers;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_choice_order(mut self, choice_order: ChoiceOrder) -> Self {
        self.choice_order = choice_order;
        self
    }

    #[must_use]
    pub fn tiers(&self) -> TierPolicy {
        self.tiers
    }

    /// Number of calls made to the upstream generator so far.
    #[must_use]
    pub fn upstream_calls(&self) -> u64 {
        self.upstream_calls.load(Ordering::Relaxed)
    }

    /// Riddle already memoised for `key`, if any.
    #[must_use]
    pub fn cached(&self, key: RequestKey) -> Option<Riddle> {
        match self.lock_slots().get(&key) {
            Some(Slot::Ready(riddle)) => Some(riddle.clone()),
            _ => None,
        }
    }

    /// Resolve `key` to a riddle.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailure` when the upstream call fails, times out, or
    /// produces a payload that does not validate.
    pub async fn fetch(&self, key: RequestKey) -> FetchResult {
        let sender = match self.claim(key) {
            Claim::Hit(riddle) => {
                debug!(?key, "riddle cache hit");
                return Ok(riddle);
            }
            Claim::Join(receiver) => {
                debug!(?key, "joining in-flight riddle request");
                return wait_for(receiver).await;
            }
            Claim::Lead(sender) => sender,
        };

        let guard = InFlightGuard {
            source: self,
            key,
            armed: true,
        };
        let result = self.generate(key).await;
        guard.settle(&result);
        sender.send_replace(Some(result.clone()));
        result
    }

    fn claim(&self, key: RequestKey) -> Claim {
        let mut slots = self.lock_slots();
        match slots.get(&key) {
            Some(Slot::Ready(riddle)) => Claim::Hit(riddle.clone()),
            Some(Slot::InFlight(receiver)) => Claim::Join(receiver.clone()),
            None => {
                let (sender, receiver) = watch::channel(None);
                slots.insert(key, Slot::InFlight(receiver));
                Claim::Lead(sender)
            }
        }
    }

    async fn generate(&self, key: RequestKey) -> FetchResult {
        let request = RiddleRequest {
            key,
            tier: self.tiers.tier_for(key),
        };
        let call = self.upstream_calls.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(?key, tier = %request.tier, call, "requesting riddle upstream");

        let payload = match tokio::time::timeout(self.timeout, self.generator.generate(&request))
            .await
        {
            Err(_) => Err(GenerationFailure::Timeout {
                after: self.timeout,
            }),
            Ok(result) => result.map_err(GenerationFailure::from),
        };

        let riddle =
            payload.and_then(|payload| payload.validate().map_err(GenerationFailure::from));
        match riddle {
            Ok(riddle) => Ok(self.arrange(riddle)),
            Err(failure) => {
                warn!(?key, %failure, "riddle generation failed");
                Err(failure)
            }
        }
    }

    fn arrange(&self, riddle: Riddle) -> Riddle {
        match self.choice_order {
            ChoiceOrder::AsGenerated => riddle,
            ChoiceOrder::Shuffled => {
                let mut order: [usize; CHOICE_COUNT] = [0, 1, 2];
                order.shuffle(&mut rand::rng());
                riddle.reordered(order).unwrap_or(riddle)
            }
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<RequestKey, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RiddleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RiddleSource")
            .field("tiers", &self.tiers)
            .field("timeout", &self.timeout)
            .field("choice_order", &self.choice_order)
            .field("upstream_calls", &self.upstream_calls())
            .finish_non_exhaustive()
    }
}

async fn wait_for(mut receiver: watch::Receiver<Option<FetchResult>>) -> FetchResult {
    let shared = match receiver.wait_for(Option::is_some).await {
        Ok(value) => (*value).clone(),
        Err(_) => None,
    };
    shared.unwrap_or(Err(GenerationFailure::Abandoned))
}

/// Clears the in-flight slot if the leading fetch is dropped before it settles,
/// so later callers start a fresh request instead of waiting forever.
struct InFlightGuard<'a> {
    source: &'a RiddleSource,
    key: RequestKey,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn settle(mut self, result: &FetchResult) {
        let mut slots = self.source.lock_slots();
        match result {
            Ok(riddle) => {
                slots.insert(self.key, Slot::Ready(riddle.clone()));
            }
            Err(_) => {
                slots.remove(&self.key);
            }
        }
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.source.lock_slots();
        if matches!(slots.get(&self.key), Some(Slot::InFlight(_))) {
            slots.remove(&self.key);
        }
    }
}
