//! Virtual clock with cancellable periodic timers.
//!
//! Time only moves when the owner asks it to, so tick-count scenarios are
//! exact. Every timer carries a generation that `arm` and `cancel` bump;
//! a [`Tick`] remembers the generation it was issued under and stops being
//! live as soon as its timer is cancelled or re-armed.

/// Handle to a registered timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(usize);

/// One firing of a periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub timer: TimerId,
    pub generation: u64,
    /// Clock time the tick was due at.
    pub due_ms: u64,
}

#[derive(Debug, Clone)]
struct TimerSlot {
    name: &'static str,
    period_ms: u64,
    next_due_ms: Option<u64>,
    generation: u64,
}

/// Millisecond clock driving a set of periodic timers.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now_ms: u64,
    timers: Vec<TimerSlot>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Register a disarmed timer. Periods below 1 ms are raised to 1 ms.
    pub fn register(&mut self, name: &'static str, period_ms: u64) -> TimerId {
        self.timers.push(TimerSlot {
            name,
            period_ms: period_ms.max(1),
            next_due_ms: None,
            generation: 0,
        });
        TimerId(self.timers.len() - 1)
    }

    /// (Re)start a timer; its first tick is one period from now.
    /// Ticks issued before this call become stale.
    pub fn arm(&mut self, id: TimerId) {
        let now = self.now_ms;
        let slot = &mut self.timers[id.0];
        slot.generation += 1;
        slot.next_due_ms = Some(now.saturating_add(slot.period_ms));
    }

    /// Stop a timer. Ticks issued before this call become stale.
    pub fn cancel(&mut self, id: TimerId) {
        let slot = &mut self.timers[id.0];
        slot.generation += 1;
        slot.next_due_ms = None;
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers[id.0].next_due_ms.is_some()
    }

    pub fn name(&self, id: TimerId) -> &'static str {
        self.timers[id.0].name
    }

    pub fn period_ms(&self, id: TimerId) -> u64 {
        self.timers[id.0].period_ms
    }

    /// Whether `tick` was issued under the timer's current arming.
    pub fn is_live(&self, tick: &Tick) -> bool {
        self.timers
            .get(tick.timer.0)
            .is_some_and(|slot| slot.generation == tick.generation)
    }

    /// Pop the earliest tick due at or before `until_ms`, moving the clock
    /// to its due time and scheduling the timer's next firing.
    ///
    /// Ties go to the timer registered first. A timer whose next firing
    /// would pass `u64::MAX` fires once more and then goes quiet.
    pub fn next_due(&mut self, until_ms: u64) -> Option<Tick> {
        let (index, due_ms) = self
            .timers
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.next_due_ms.filter(|due| *due <= until_ms).map(|due| (i, due)))
            .min_by_key(|(i, due)| (*due, *i))?;

        let slot = &mut self.timers[index];
        slot.next_due_ms = due_ms.checked_add(slot.period_ms);
        self.now_ms = self.now_ms.max(due_ms);

        Some(Tick {
            timer: TimerId(index),
            generation: slot.generation,
            due_ms,
        })
    }

    /// Move the clock forward to `until_ms` without firing anything.
    /// Call after draining [`next_due`](Self::next_due).
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
