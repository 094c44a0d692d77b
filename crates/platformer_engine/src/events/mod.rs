//! Deferred event queue
//!
//! One-shot timers scheduled against the game clock. Every entry carries the
//! [`Generation`] of the session that posted it, so a session that has been
//! replaced by a restart can recognise and ignore its predecessor's timers.
//! Delivery happens on the main loop; nothing here runs concurrently.

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a posted timer
    pub struct TimerHandle;
}

/// Session epoch; bumped on every restart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// The first session's generation
    pub const FIRST: Self = Self(0);

    /// Generation of the session that replaces this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Work a timer performs when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredEvent {
    /// Power-up has run out; restore normal jump
    DeactivatePowerUp,
    /// Remove the level-complete banner
    RemoveBanner,
}

/// A timer waiting in the queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEvent {
    /// Clock time (seconds) at which the event becomes due
    pub delivery_time: f64,
    /// Session that posted the event
    pub generation: Generation,
    /// What to do when it fires
    pub event: DeferredEvent,
    sequence: u64,
}

/// Queue of one-shot deferred events
#[derive(Debug)]
pub struct TimerQueue {
    pending: SlotMap<TimerHandle, ScheduledEvent>,
    current_time: f64,
    next_sequence: u64,
}

impl TimerQueue {
    /// Create a new empty queue with the clock at zero
    pub fn new() -> Self {
        Self {
            pending: SlotMap::with_key(),
            current_time: 0.0,
            next_sequence: 0,
        }
    }

    /// Update current time (seconds since start)
    pub fn update_time(&mut self, time: f64) {
        self.current_time = time;
    }

    /// Current clock time in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Post event for deferred delivery at specified time
    pub fn post(&mut self, delivery_time: f64, generation: Generation, event: DeferredEvent) -> TimerHandle {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.pending.insert(ScheduledEvent {
            delivery_time,
            generation,
            event,
            sequence,
        })
    }

    /// Post event for delivery `delay` seconds from now
    pub fn post_after(&mut self, delay: f64, generation: Generation, event: DeferredEvent) -> TimerHandle {
        self.post(self.current_time + delay, generation, event)
    }

    /// Remove and return every event that is due, earliest first.
    /// Events due at the same instant come out in the order they were posted.
    pub fn take_due(&mut self) -> Vec<ScheduledEvent> {
        let now = self.current_time;
        let due_handles: Vec<TimerHandle> = self
            .pending
            .iter()
            .filter(|(_, scheduled)| scheduled.delivery_time <= now)
            .map(|(handle, _)| handle)
            .collect();

        let mut due: Vec<ScheduledEvent> = due_handles
            .into_iter()
            .filter_map(|handle| self.pending.remove(handle))
            .collect();
        due.sort_by(|a, b| {
            a.delivery_time
                .total_cmp(&b.delivery_time)
                .then(a.sequence.cmp(&b.sequence))
        });
        due
    }

    /// Whether a timer is still waiting to fire
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(handle)
    }

    /// Number of timers waiting to fire
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are waiting
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}
