//! Declaration sugar for static and thread-local lazy globals.
//!
//! Rust statics are const-evaluated, so a `static` holding a [`LazyValue`]
//! or [`LazyAction`] involves no life-before-main code and no ordering
//! relationship with any other static - the bound expression runs on first
//! access, wherever that happens. These macros only spell that pattern out.
//!
//! [`LazyValue`]: crate::LazyValue
//! [`LazyAction`]: crate::LazyAction

/// Declares a process-lifetime lazily-initialized value.
///
/// Expands to a `static` [`LazyValue`](crate::LazyValue) whose initializer
/// is the given expression. The expression must not capture locals.
///
/// # Examples
///
/// ```rust
/// lazy_once::static_lazy! {
///    static ANSWER: u32 = 6 * 7;
/// }
///
/// assert_eq!(*ANSWER.get(), 42);
/// ```
#[macro_export]
macro_rules! static_lazy {
   ($(#[$attr:meta])* $vis:vis static $name:ident: $ty:ty = $init:expr;) => {
      $(#[$attr])*
      $vis static $name: $crate::LazyValue<$ty> = $crate::LazyValue::new(|| $init);
   };
}

/// Declares a thread-local lazily-initialized value.
///
/// Each thread gets its own [`LazyValue`](crate::LazyValue) instance,
/// initialized on that thread's first access. Access goes through
/// [`LocalKey::with`](std::thread::LocalKey::with), like any thread-local.
///
/// # Examples
///
/// ```rust
/// lazy_once::thread_local_lazy! {
///    static BUFFER: String = String::from("per-thread");
/// }
///
/// BUFFER.with(|buf| assert_eq!(buf.get(), "per-thread"));
/// ```
#[macro_export]
macro_rules! thread_local_lazy {
   ($(#[$attr:meta])* $vis:vis static $name:ident: $ty:ty = $init:expr;) => {
      ::std::thread_local! {
         $(#[$attr])*
         $vis static $name: $crate::LazyValue<$ty> = $crate::LazyValue::new(|| $init);
      }
   };
}

/// Declares a process-lifetime deferred action.
///
/// Expands to a `static` [`LazyAction`](crate::LazyAction) that runs the
/// given expression on its first [`call`](crate::LazyAction::call).
///
/// # Examples
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// static RUNS: AtomicUsize = AtomicUsize::new(0);
///
/// lazy_once::static_lazy_action! {
///    static BOOTSTRAP = RUNS.fetch_add(1, Ordering::Relaxed);
/// }
///
/// BOOTSTRAP.call();
/// BOOTSTRAP.call();
/// assert_eq!(RUNS.load(Ordering::Relaxed), 1);
/// ```
#[macro_export]
macro_rules! static_lazy_action {
   ($(#[$attr:meta])* $vis:vis static $name:ident = $action:expr;) => {
      $(#[$attr])*
      $vis static $name: $crate::LazyAction = $crate::LazyAction::new(|| {
         $action;
      });
   };
}
