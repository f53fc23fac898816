//! Exactly-once action gate.
//!
//! [`OnceGate`] runs a zero-argument action at most once across concurrent
//! callers. It carries no payload; the only observable effect is the action
//! itself plus the "done" flag. Useful for one-shot setup work such as
//! installing a hook or spawning a background worker, where there is no
//! value to cache.

use core::fmt;

use crate::state::AtomicState;

/// A gate that runs an action exactly once, no matter how many threads call.
///
/// Concurrent callers of [`call`](OnceGate::call) block until the winning
/// call finishes; every caller returns only after the action has run to
/// completion exactly once. If the action fails, the gate rolls back to its
/// virgin state and a later caller may try again - there is no poisoning.
pub struct OnceGate {
   state: AtomicState,
}

impl OnceGate {
   /// Creates a new gate. The action has not run.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         state: AtomicState::new(),
      }
   }

   /// Checks whether an action has ever completed on this gate.
   ///
   /// This method never blocks and never runs an action.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.state.is_initialized()
   }

   /// Runs `f` if no prior invocation on this gate has ever completed.
   ///
   /// - If the gate is already done, returns immediately (one atomic load).
   /// - Otherwise the first caller to claim the gate runs `f`; everyone else
   ///   blocks until that run finishes, then returns without running `f`.
   /// - If `f` panics, the gate rolls back to its virgin state and the panic
   ///   propagates to the calling thread; subsequent callers are free to
   ///   attempt the action again.
   ///
   /// Calling back into this gate from inside `f` deadlocks.
   #[inline]
   pub fn call<F>(&self, f: F)
   where
      F: FnOnce(),
   {
      if self.is_initialized() {
         return;
      }
      // Cold path: needs to run (or wait out) the action
      self.run(f);
   }

   /// Runs fallible `f` if no prior invocation on this gate has completed.
   ///
   /// - If the gate is already done, returns `Ok(())` without running `f`.
   /// - On `Ok(())` from `f`, marks the gate done and returns `Ok(())`.
   /// - On `Err(e)` from `f`, rolls the gate back to its virgin state and
   ///   returns `Err(e)` to this caller only; threads that were blocked on
   ///   the same call observe the rollback and race to retry.
   pub fn try_call<F, E>(&self, f: F) -> Result<(), E>
   where
      F: FnOnce() -> Result<(), E>,
   {
      if self.is_initialized() {
         return Ok(());
      }
      // Cold path: needs an attempt
      self.try_run(f)
   }

   /// Returns the gate to its virgin state, allowing the action to run again.
   ///
   /// If an action is in flight, waits for it to finish first, so two actions
   /// never run concurrently. The ordering observed by callers racing this
   /// reset is timing-dependent: a racing `call` may run its action before or
   /// after the reset takes effect.
   pub fn reset(&self) {
      match self.state.begin() {
         // Claimed the window; dropping the guard leaves the gate virgin.
         Some(guard) => drop(guard),
         // An action had completed; clear the done flag.
         None => {
            self.state.set_uninitialized();
         }
      }
   }

   /// Cold path for `call`. Claims the gate and runs the action.
   #[cold]
   fn run<F>(&self, f: F)
   where
      F: FnOnce(),
   {
      let Some(guard) = self.state.begin() else {
         return; // another thread completed the action while we waited
      };
      f(); // on panic the guard drops and the state rolls back
      guard.commit();
   }

   /// Cold path for `try_call`. Claims the gate and runs the fallible action.
   #[cold]
   fn try_run<F, E>(&self, f: F) -> Result<(), E>
   where
      F: FnOnce() -> Result<(), E>,
   {
      let Some(guard) = self.state.begin() else {
         return Ok(()); // another thread completed the action while we waited
      };
      f()?; // on Err the guard drops and the state rolls back
      guard.commit();
      Ok(())
   }
}

impl Default for OnceGate {
   /// Creates a new gate whose action has not run.
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl fmt::Debug for OnceGate {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("OnceGate")
         .field("initialized", &self.is_initialized())
         .finish()
   }
}
