//! One-shot timer scheduler on a virtual clock
//!
//! Timers are keyed by fire time in a min-heap. Cancellation removes the
//! payload from the live table; the heap entry is dropped lazily when it
//! reaches the front. Fired timers are handed back to the caller as data
//! (`TimerEvent`) so the owner of the game state applies them, which keeps
//! every mutation on the tick thread.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::pickup::PickupKind;
use super::state::Effect;

/// Handle to a scheduled timer, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// What should happen when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// A player effect ran out
    EffectExpired(Effect),
    /// A pickup's respawn delay elapsed
    PickupSpawn(PickupKind),
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub event: TimerEvent,
    pub fire_at: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    /// Current virtual time in milliseconds
    now_ms: u64,
    next_id: u64,
    /// (fire_at, id); id breaks ties in scheduling order
    queue: BinaryHeap<Reverse<(u64, u64)>>,
    live: HashMap<u64, TimerEvent>,
}

impl Scheduler {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `event` to fire `delay_ms` after the current time
    pub fn schedule(&mut self, delay_ms: u64, event: TimerEvent) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        let fire_at = self.now_ms.saturating_add(delay_ms);
        self.queue.push(Reverse((fire_at, id)));
        self.live.insert(id, event);
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle.0).is_some()
    }

    /// Cancel whatever timer a slot holds and empty the slot
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerHandle>) {
        if let Some(handle) = slot.take() {
            self.cancel(handle);
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.live.contains_key(&handle.0)
    }

    /// Number of timers still waiting to fire
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Pop the next timer due at or before `until_ms`.
    ///
    /// The clock advances to each timer's fire time as it is returned, so a
    /// handler that reschedules measures its delay from the firing moment.
    /// Once nothing else is due the clock settles at `until_ms`. Time never
    /// runs backwards.
    pub fn poll(&mut self, until_ms: u64) -> Option<Fired> {
        while let Some(&Reverse((fire_at, id))) = self.queue.peek() {
            if fire_at > until_ms {
                break;
            }
            self.queue.pop();
            if let Some(event) = self.live.remove(&id) {
                self.now_ms = self.now_ms.max(fire_at);
                return Some(Fired {
                    handle: TimerHandle(id),
                    event,
                    fire_at,
                });
            }
        }
        self.now_ms = self.now_ms.max(until_ms);
        None
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
        self.live.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain(scheduler: &mut Scheduler, until: u64) -> Vec<Fired> {
        std::iter::from_fn(|| scheduler.poll(until)).collect()
    }

    #[test]
    fn test_fires_once_after_delay() {
        let mut s = Scheduler::new(1000);
        let h = s.schedule(500, TimerEvent::EffectExpired(Effect::Invincibility));

        assert!(drain(&mut s, 1499).is_empty());
        assert!(s.is_pending(h));

        let fired = drain(&mut s, 1500);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, h);
        assert_eq!(fired[0].fire_at, 1500);
        assert!(!s.is_pending(h));

        // Fire-once: nothing left afterwards
        assert!(drain(&mut s, 100_000).is_empty());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut s = Scheduler::new(0);
        let h = s.schedule(100, TimerEvent::PickupSpawn(PickupKind::Speed));
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert_eq!(s.pending(), 0);
        assert!(drain(&mut s, 1000).is_empty());
    }

    #[test]
    fn test_cancel_slot_empties_slot() {
        let mut s = Scheduler::new(0);
        let mut slot = Some(s.schedule(10, TimerEvent::PickupSpawn(PickupKind::BounceShield)));
        s.cancel_slot(&mut slot);
        assert!(slot.is_none());
        assert!(drain(&mut s, 10).is_empty());
    }

    #[test]
    fn test_clock_tracks_fire_time_while_draining() {
        let mut s = Scheduler::new(0);
        s.schedule(100, TimerEvent::EffectExpired(Effect::SpeedBoost));

        let fired = s.poll(1000).unwrap();
        assert_eq!(s.now_ms(), 100);

        // A handler rescheduling now measures from the firing moment
        s.schedule(200, fired.event);
        let again = s.poll(1000).unwrap();
        assert_eq!(again.fire_at, 300);

        assert!(s.poll(1000).is_none());
        assert_eq!(s.now_ms(), 1000);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut s = Scheduler::new(500);
        assert!(s.poll(100).is_none());
        assert_eq!(s.now_ms(), 500);
    }

    #[test]
    fn test_same_fire_time_keeps_schedule_order() {
        let mut s = Scheduler::new(0);
        let a = s.schedule(50, TimerEvent::PickupSpawn(PickupKind::Speed));
        let b = s.schedule(50, TimerEvent::PickupSpawn(PickupKind::Invincibility));
        let fired = drain(&mut s, 50);
        assert_eq!(fired.iter().map(|f| f.handle).collect::<Vec<_>>(), vec![a, b]);
    }

    proptest! {
        #[test]
        fn prop_fires_in_time_order(delays in prop::collection::vec(0u64..10_000, 1..40)) {
            let mut s = Scheduler::new(0);
            for d in &delays {
                s.schedule(*d, TimerEvent::EffectExpired(Effect::BounceShield));
            }
            let fired = drain(&mut s, 10_000);
            prop_assert_eq!(fired.len(), delays.len());
            for pair in fired.windows(2) {
                prop_assert!(pair[0].fire_at <= pair[1].fire_at);
            }
        }

        #[test]
        fn prop_cancelled_subset_is_skipped(
            delays in prop::collection::vec(1u64..5_000, 1..30),
            mask in prop::collection::vec(any::<bool>(), 30),
        ) {
            let mut s = Scheduler::new(0);
            let mut kept = 0;
            for (i, d) in delays.iter().enumerate() {
                let h = s.schedule(*d, TimerEvent::PickupSpawn(PickupKind::Speed));
                if mask[i] {
                    s.cancel(h);
                } else {
                    kept += 1;
                }
            }
            prop_assert_eq!(drain(&mut s, 5_000).len(), kept);
        }
    }
}
