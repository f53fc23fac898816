//! Lazily-initialized value cell.
//!
//! [`ValueCell<T>`] computes and caches a value of type `T` exactly once,
//! then hands out the same reference on every subsequent access. The fast
//! path (reading an initialized cell) costs a single atomic load; the slow
//! path serializes competing initializers and blocks losers until the winner
//! finishes or fails.

use core::cell::UnsafeCell;
use core::fmt;
use core::mem::MaybeUninit;
use core::ops::{Deref, DerefMut};

use crate::state::AtomicState;

/// A thread-safe cell whose value is computed at most once.
///
/// The payload slot holds a live `T` exactly when the cell's state machine
/// reads `Initialized`; absence is tracked out of band, so no sentinel value
/// can collide with a legitimate payload. Once stored, the value is never
/// mutated or replaced through `&self`; clearing it requires exclusive access
/// via [`reset`](ValueCell::reset).
pub struct ValueCell<T> {
   value: UnsafeCell<MaybeUninit<T>>,
   state: AtomicState,
}

impl<T> ValueCell<T> {
   /// Creates a new, uninitialized cell.
   #[inline]
   #[must_use]
   pub const fn new() -> Self {
      Self {
         state: AtomicState::new(),
         value: UnsafeCell::new(MaybeUninit::uninit()),
      }
   }

   /// Creates a cell that is already initialized with `value`.
   #[inline]
   #[must_use]
   pub const fn with_value(value: T) -> Self {
      Self {
         state: AtomicState::initialized(),
         value: UnsafeCell::new(MaybeUninit::new(value)),
      }
   }

   /// Checks whether the cell holds a value.
   ///
   /// This method never blocks and never runs an initializer.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.state.is_initialized()
   }

   /// Returns a reference to the value if initialized, `None` otherwise.
   ///
   /// Never blocks and never runs an initializer; a cell currently being
   /// initialized by another thread reads as `None`.
   #[inline]
   pub fn get(&self) -> Option<&T> {
      if self.is_initialized() {
         // SAFETY: is_initialized() observed Initialized with acquire
         // ordering, so the payload write happens-before this read.
         Some(unsafe { self.get_unchecked() })
      } else {
         None
      }
   }

   /// Returns a mutable reference to the value if initialized.
   ///
   /// Requires exclusive access and never blocks.
   #[inline]
   pub fn get_mut(&mut self) -> Option<&mut T> {
      if self.is_initialized() {
         // SAFETY: the state says the slot is live and we have exclusive
         // access (`&mut self`).
         Some(unsafe { self.get_unchecked_mut() })
      } else {
         None
      }
   }

   /// Returns a reference to the value without checking the state.
   ///
   /// # Safety
   ///
   /// The cell must be initialized; calling this on an uninitialized cell is
   /// undefined behavior.
   #[inline]
   pub unsafe fn get_unchecked(&self) -> &T {
      debug_assert!(
         self.is_initialized(),
         "get_unchecked called on uninitialized ValueCell"
      );
      // SAFETY: the caller guarantees the slot holds a live value.
      unsafe { (*self.value.get()).assume_init_ref() }
   }

   /// Returns a mutable reference to the value without checking the state.
   ///
   /// # Safety
   ///
   /// The cell must be initialized; calling this on an uninitialized cell is
   /// undefined behavior.
   #[inline]
   pub unsafe fn get_unchecked_mut(&mut self) -> &mut T {
      debug_assert!(
         self.is_initialized(),
         "get_unchecked_mut called on uninitialized ValueCell"
      );
      // SAFETY: the caller guarantees the slot holds a live value, and we
      // have exclusive access.
      unsafe { self.value.get_mut().assume_init_mut() }
   }

   /// Returns the value, computing it with `f` on first access.
   ///
   /// - If initialized, returns the cached value (one atomic load).
   /// - Otherwise the first caller to claim the cell runs `f` and stores its
   ///   result; competing callers block until the store completes, then all
   ///   of them - winner and losers - observe the identical value.
   /// - If `f` panics, the slot stays empty, the cell rolls back to its
   ///   virgin state, and the panic propagates to the calling thread; a later
   ///   caller's initializer may then run.
   ///
   /// Calling back into this cell from inside `f` deadlocks.
   #[inline]
   pub fn get_or_init<F>(&self, f: F) -> &T
   where
      F: FnOnce() -> T,
   {
      if let Some(value) = self.get() {
         return value;
      }
      // Cold path: needs initialization
      self.initialize(f);
      // SAFETY: initialize() only returns normally once the cell is
      // initialized, by us or by the thread we waited on.
      unsafe { self.get_unchecked() }
   }

   /// Returns the value, computing it with fallible `f` on first access.
   ///
   /// - If initialized, returns `Ok(&value)` without running `f`.
   /// - On `Ok(value)` from `f`, stores it and returns `Ok(&value)`.
   /// - On `Err(e)` from `f`, leaves the slot empty, rolls the cell back to
   ///   its virgin state, and returns `Err(e)` to this caller only; threads
   ///   blocked on the same cell observe the rollback and race to retry.
   pub fn get_or_try_init<F, E>(&self, f: F) -> Result<&T, E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      if let Some(value) = self.get() {
         return Ok(value);
      }
      // Cold path: needs an initialization attempt
      self.try_initialize(f)?;
      debug_assert!(self.is_initialized());
      // SAFETY: try_initialize() succeeded, so the cell is initialized.
      Ok(unsafe { self.get_unchecked() })
   }

   /// Clears the cell, dropping the value and restoring the virgin state.
   ///
   /// After a reset the cell reads as uninitialized again and the next
   /// `get_or_init` runs its initializer. Exclusive access guarantees no
   /// reference to the old value survives the reset.
   #[inline]
   pub fn reset(&mut self) {
      if self.state.set_uninitialized() {
         // SAFETY: the state said Initialized, so the slot holds a live
         // value; exclusive access means no one else is reading it.
         unsafe { self.value.get_mut().assume_init_drop() };
      }
   }

   /// Cold path for `get_or_init`. Claims the cell and runs the initializer.
   #[cold]
   fn initialize<F>(&self, f: F)
   where
      F: FnOnce() -> T,
   {
      let Some(guard) = self.state.begin() else {
         return; // another thread initialized the cell while we waited
      };
      // SAFETY: the guard serializes initializers, so the slot is ours to
      // write. If f() panics the guard drops and nothing was written.
      unsafe { (*self.value.get()).write(f()) };
      guard.commit();
   }

   /// Cold path for `get_or_try_init`. Claims the cell and runs the fallible
   /// initializer.
   #[cold]
   fn try_initialize<F, E>(&self, f: F) -> Result<(), E>
   where
      F: FnOnce() -> Result<T, E>,
   {
      let Some(guard) = self.state.begin() else {
         return Ok(()); // another thread initialized the cell while we waited
      };
      let value = f()?; // on Err the guard drops and the state rolls back
      // SAFETY: the guard serializes initializers, so the slot is ours.
      unsafe { (*self.value.get()).write(value) };
      guard.commit();
      Ok(())
   }
}

// --- Trait implementations ---

// SAFETY:
// `&ValueCell<T>` hands out `&T` across threads, so `Sync` requires
// `T: Sync`; `T: Send` is also required because the value written by one
// thread may be dropped by another.
unsafe impl<T: Sync + Send> Sync for ValueCell<T> {}
// SAFETY: moving the cell moves the value, so `Send` requires `T: Send`.
unsafe impl<T: Send> Send for ValueCell<T> {}

impl<T> Default for ValueCell<T> {
   /// Creates a new, uninitialized cell.
   #[inline]
   fn default() -> Self {
      Self::new()
   }
}

impl<T> From<T> for ValueCell<T> {
   /// Creates a cell already initialized with `value`.
   #[inline]
   fn from(value: T) -> Self {
      Self::with_value(value)
   }
}

impl<T> Deref for ValueCell<T> {
   type Target = T;

   /// Dereferences to the cached value.
   ///
   /// # Panics
   ///
   /// Panics if the cell is uninitialized. Check
   /// [`is_initialized`](ValueCell::is_initialized) or use
   /// [`get`](ValueCell::get) when the state is in doubt.
   #[inline]
   fn deref(&self) -> &T {
      match self.get() {
         Some(value) => value,
         None => panic!("ValueCell dereferenced while uninitialized"),
      }
   }
}

impl<T> DerefMut for ValueCell<T> {
   /// Mutably dereferences to the cached value.
   ///
   /// # Panics
   ///
   /// Panics if the cell is uninitialized.
   #[inline]
   fn deref_mut(&mut self) -> &mut T {
      match self.get_mut() {
         Some(value) => value,
         None => panic!("ValueCell dereferenced while uninitialized"),
      }
   }
}

impl<T: fmt::Display> fmt::Display for ValueCell<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self.get() {
         Some(v) => fmt::Display::fmt(v, f),
         None => f.write_str("<uninit>"),
      }
   }
}

impl<T: fmt::Debug> fmt::Debug for ValueCell<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("ValueCell");
      match self.get() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

impl<T: PartialEq> PartialEq for ValueCell<T> {
   /// Two cells are equal if both are uninitialized, or both are initialized
   /// with equal values.
   #[inline]
   fn eq(&self, other: &Self) -> bool {
      self.get() == other.get()
   }
}

impl<T: Eq> Eq for ValueCell<T> {}

impl<T> Drop for ValueCell<T> {
   #[inline]
   fn drop(&mut self) {
      if self.is_initialized() {
         // SAFETY: the slot holds a live value and it will not be accessed
         // again.
         unsafe { self.value.get_mut().assume_init_drop() };
      }
   }
}
