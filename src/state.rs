//! Internal synchronization state shared by `OnceGate` and `ValueCell`.
//!
//! This module implements the three-state lifecycle behind every primitive in
//! the crate: `Uninitialized → Initializing → Initialized`, with a rollback
//! from `Initializing` to `Uninitialized` when an initializer fails. The
//! state is packed into a single `AtomicU8`:
//!
//! - Bits 0-1: the [`State`] discriminant
//! - Bit 2: WAITING - at least one thread is parked on this word
//!
//! The `Initializing` claim doubles as the mutual-exclusion lock for the
//! transition window: the thread whose compare-exchange moves the state from
//! `Uninitialized` to `Initializing` owns the window, and everyone else parks
//! on the word via `parking_lot_core` until the owner commits or rolls back.
//! Reads of an initialized cell therefore cost one acquire load and never
//! touch the futex.

use core::mem;
use core::sync::atomic::{AtomicU8, Ordering};

use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};

/// Lifecycle of a gate or cell.
///
/// Transitions are monotonic within one lifecycle; the only backward edge is
/// the failure rollback `Initializing → Uninitialized`, which opens a fresh
/// lifecycle for whichever caller claims it next.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub(crate) enum State {
   /// No payload, no one in the transition window.
   Uninitialized = 0,
   /// One thread is running an initializer; everyone else waits.
   Initializing = 1,
   /// The lifecycle completed; the payload (if any) is live.
   Initialized = 2,
}

impl State {
   #[inline(always)]
   const fn from_bits(bits: u8) -> Self {
      match bits & AtomicState::STATE_MASK {
         0 => Self::Uninitialized,
         1 => Self::Initializing,
         _ => Self::Initialized,
      }
   }
}

/// Atomic holder for a [`State`] plus the futex bookkeeping bit.
#[repr(transparent)]
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
   /// Mask for the [`State`] discriminant bits.
   const STATE_MASK: u8 = 0b011;
   /// Bit flag: at least one thread is parked waiting on this word.
   const WAITING: u8 = 0b100;

   /// Creates a state word representing an uninitialized lifecycle.
   #[inline]
   pub(crate) const fn new() -> Self {
      Self(AtomicU8::new(State::Uninitialized as u8))
   }

   /// Creates a state word representing an already-completed lifecycle.
   #[inline]
   pub(crate) const fn initialized() -> Self {
      Self(AtomicU8::new(State::Initialized as u8))
   }

   /// Checks whether the lifecycle has completed.
   ///
   /// A single acquire load: a `true` result makes every write that preceded
   /// the completing release store visible to this thread.
   #[inline]
   pub(crate) fn is_initialized(&self) -> bool {
      State::from_bits(self.0.load(Ordering::Acquire)) == State::Initialized
   }

   /// Wakes every thread parked on this word.
   #[inline]
   fn notify_all(&self) {
      // SAFETY: the key passed to unpark matches the key used in `wait`; we
      // consistently key on the address of the AtomicU8.
      unsafe {
         parking_lot_core::unpark_all(self.0.as_ptr() as usize, DEFAULT_UNPARK_TOKEN);
      }
   }

   /// Parks the calling thread until the word changes from `expected`.
   #[inline]
   fn wait(&self, expected: u8) {
      // SAFETY: see the key comment in `notify_all`.
      unsafe {
         // park() re-validates under its queue lock and only sleeps if the
         // word still equals `expected`; wake-ups may be spurious, so the
         // caller loops and re-checks.
         let _ = parking_lot_core::park(
            self.0.as_ptr() as usize,
            || self.0.load(Ordering::Acquire) == expected,
            || {},
            |_, _| {},
            DEFAULT_PARK_TOKEN,
            None,
         );
      }
   }

   /// Marks the lifecycle complete and wakes waiters.
   ///
   /// The release ordering publishes the initializing thread's payload writes
   /// to every thread that later observes `Initialized` with an acquire load.
   #[inline]
   pub(crate) fn set_initialized(&self) {
      let prev = self.0.swap(State::Initialized as u8, Ordering::Release);
      if prev & Self::WAITING != 0 {
         self.notify_all();
      }
   }

   /// Rolls the lifecycle back to `Uninitialized` and wakes waiters.
   ///
   /// Returns `true` if the previous state was `Initialized`, i.e. a payload
   /// slot may hold a live value the caller must dispose of.
   #[inline]
   pub(crate) fn set_uninitialized(&self) -> bool {
      let prev = self.0.swap(State::Uninitialized as u8, Ordering::Release);
      if prev & Self::WAITING != 0 {
         self.notify_all();
      }
      State::from_bits(prev) == State::Initialized
   }

   /// One round of the double-checked protocol.
   ///
   /// Returns:
   ///   - `Ok(None)`: the lifecycle is already complete.
   ///   - `Ok(Some(guard))`: this thread claimed the transition window.
   ///   - `Err(word)`: another thread owns the window; `word` is the value to
   ///     park against (WAITING already set).
   #[inline]
   fn begin_step(&self) -> Result<Option<InitGuard<'_>>, u8> {
      loop {
         let observed = self.0.load(Ordering::Relaxed);
         match State::from_bits(observed) {
            State::Initialized => return Ok(None),
            State::Uninitialized => {
               // Claim the window. The successful exchange is the lock
               // acquisition; acquire pairs with the release in
               // `set_uninitialized` so a reclaimed lifecycle observes the
               // rolled-back slot.
               match self.0.compare_exchange_weak(
                  observed,
                  State::Initializing as u8,
                  Ordering::Acquire,
                  Ordering::Relaxed,
               ) {
                  Ok(_) => return Ok(Some(InitGuard::new(self))),
                  Err(_) => {
                     core::hint::spin_loop();
                     continue;
                  }
               }
            }
            State::Initializing => {
               if observed & Self::WAITING != 0 {
                  return Err(observed);
               }
               // Register interest before parking so the window owner knows
               // to wake us on commit or rollback.
               let registered = observed | Self::WAITING;
               match self.0.compare_exchange_weak(
                  observed,
                  registered,
                  Ordering::Relaxed,
                  Ordering::Relaxed,
               ) {
                  Ok(_) => return Err(registered),
                  Err(_) => {
                     core::hint::spin_loop();
                     continue;
                  }
               }
            }
         }
      }
   }

   /// Enters the transition window, blocking while another thread owns it.
   ///
   /// Returns `Some(guard)` if this thread claimed the window (the lifecycle
   /// was, or rolled back to, `Uninitialized`), or `None` if the lifecycle
   /// completed in the meantime. Waiters that observe a rollback race to
   /// claim the next window; no particular thread is favored.
   #[inline]
   pub(crate) fn begin(&self) -> Option<InitGuard<'_>> {
      match self.begin_step() {
         Ok(guard) => guard,
         Err(mut observed) => loop {
            self.wait(observed);
            match self.begin_step() {
               Ok(guard) => return guard,
               Err(now) => observed = now,
            }
         },
      }
   }
}

/// Ownership of one transition window, returned by [`AtomicState::begin`].
///
/// Dropping the guard rolls the state back to `Uninitialized` - this is the
/// failure path, taken when an initializer returns an error or panics out of
/// the window. Call [`commit`](InitGuard::commit) on success instead.
pub(crate) struct InitGuard<'a> {
   state: &'a AtomicState,
}

impl<'a> InitGuard<'a> {
   /// Wraps a claimed window. The word must already read `Initializing`.
   #[inline(always)]
   const fn new(state: &'a AtomicState) -> Self {
      Self { state }
   }

   /// Marks the lifecycle complete, wakes waiters, and consumes the guard.
   #[inline(always)]
   pub(crate) fn commit(self) {
      self.state.set_initialized();
      mem::forget(self); // Drop would roll the fresh state back
   }
}

impl Drop for InitGuard<'_> {
   #[inline(always)]
   fn drop(&mut self) {
      self.state.set_uninitialized();
   }
}
