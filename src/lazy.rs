//! Wrappers binding an initializer to a cell or gate at construction time.
//!
//! [`LazyValue`] pairs a [`ValueCell`] with its initializer so call sites
//! don't repeat it; [`LazyAction`] does the same for a payload-free
//! [`OnceGate`]. Neither adds concurrency behavior of its own - every
//! guarantee is inherited from the underlying primitive.
//!
//! The initializer bound is [`Fn`], not [`FnOnce`]: a failed attempt rolls
//! the state back and a [`reset`](LazyValue::reset) reopens the lifecycle, so
//! the bound function may legitimately run again. Neither wrapper is `Clone` -
//! duplicating the cell identity would break the exactly-once guarantee
//! across the copies. Both move freely.

use core::fmt;
use core::ops::Deref;

use crate::cell::ValueCell;
use crate::gate::OnceGate;

/// A value computed on first access by a function bound at construction.
///
/// The default `F = fn() -> T` makes `LazyValue<T>` nameable in statics
/// initialized from a non-capturing closure.
pub struct LazyValue<T, F = fn() -> T> {
   cell: ValueCell<T>,
   init: F,
}

impl<T, F> LazyValue<T, F>
where
   F: Fn() -> T,
{
   /// Binds `init` to a fresh cell. `init` does not run until first access.
   #[inline]
   #[must_use]
   pub const fn new(init: F) -> Self {
      Self {
         cell: ValueCell::new(),
         init,
      }
   }

   /// Returns the value, computing it on first access.
   ///
   /// Forwards to [`ValueCell::get_or_init`] with the bound initializer; the
   /// exactly-once and rollback guarantees are inherited unchanged.
   #[inline]
   pub fn get(&self) -> &T {
      self.cell.get_or_init(&self.init)
   }

   /// Returns the value if already computed. Never runs the initializer.
   #[inline]
   pub fn try_get(&self) -> Option<&T> {
      self.cell.get()
   }

   /// Checks whether the value has been computed. Never blocks.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.cell.is_initialized()
   }

   /// Drops the cached value; the next access runs the initializer again.
   #[inline]
   pub fn reset(&mut self) {
      self.cell.reset();
   }
}

impl<T, F> Deref for LazyValue<T, F>
where
   F: Fn() -> T,
{
   type Target = T;

   /// Dereferences to the value, computing it on first access.
   #[inline]
   fn deref(&self) -> &T {
      self.get()
   }
}

impl<T: fmt::Debug, F> fmt::Debug for LazyValue<T, F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("LazyValue");
      match self.cell.get() {
         Some(v) => d.field(v),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

/// A payload-free action run on first call by a function bound at
/// construction.
pub struct LazyAction<F = fn()> {
   gate: OnceGate,
   action: F,
}

impl<F> LazyAction<F>
where
   F: Fn(),
{
   /// Binds `action` to a fresh gate. `action` does not run until first call.
   #[inline]
   #[must_use]
   pub const fn new(action: F) -> Self {
      Self {
         gate: OnceGate::new(),
         action,
      }
   }

   /// Runs the bound action if it has never completed on this instance.
   ///
   /// Forwards to [`OnceGate::call`]; the exactly-once and rollback
   /// guarantees are inherited unchanged.
   #[inline]
   pub fn call(&self) {
      self.gate.call(&self.action);
   }

   /// Checks whether the action has completed. Never blocks.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.gate.is_initialized()
   }

   /// Rearms the gate; the next call runs the action again.
   #[inline]
   pub fn reset(&self) {
      self.gate.reset();
   }
}

impl<F> fmt::Debug for LazyAction<F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("LazyAction")
         .field("initialized", &self.gate.is_initialized())
         .finish()
   }
}
