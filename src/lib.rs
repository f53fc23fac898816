//! Thread-safe, exactly-once deferred initialization primitives.
//!
//! This crate provides two core types built on one shared state machine:
//!
//! - [`ValueCell<T>`]: lazily computes and caches a value exactly once,
//!   returning the same reference on every subsequent access.
//! - [`OnceGate`]: runs a payload-free action exactly once across concurrent
//!   callers.
//!
//! [`LazyValue`] and [`LazyAction`] bind the initializer at construction so
//! call sites don't repeat it, and the [`static_lazy!`],
//! [`thread_local_lazy!`], and [`static_lazy_action!`] macros declare
//! process-wide or per-thread instances.
//!
//! # Guarantees
//!
//! - **Exactly-once**: however many threads race, the initializer runs once
//!   per successful lifecycle and every caller observes the same value.
//! - **Cheap fast path**: reading an initialized cell is one atomic acquire
//!   load; no lock is touched.
//! - **Failure rollback**: an initializer that returns an error or panics
//!   leaves the cell empty and eligible for a fresh attempt by any later
//!   caller. There is no poisoning.
//! - **Efficient blocking**: slow-path callers park on a futex
//!   (`parking_lot_core`) while the winner's initializer runs.
//!
//! Re-entrant initialization - the initializer calling back into the same
//! instance - deadlocks, as does any lock acquired recursively.
//!
//! # Examples
//!
//! ## Caching a value
//!
//! ```rust
//! use lazy_once::ValueCell;
//!
//! static CONFIG: ValueCell<String> = ValueCell::new();
//!
//! // Runs the closure on first access only.
//! CONFIG.get_or_init(|| "production".to_string());
//!
//! // Later initializers are ignored; the cached value wins.
//! let value = CONFIG.get_or_init(|| "staging".to_string());
//! assert_eq!(value, "production");
//! ```
//!
//! ## Running an action once
//!
//! ```rust
//! use lazy_once::OnceGate;
//!
//! static HOOKS: OnceGate = OnceGate::new();
//!
//! fn install_hooks() {
//!    HOOKS.call(|| {
//!       // runs at most once, no matter how many threads get here
//!    });
//! }
//!
//! install_hooks();
//! install_hooks();
//! assert!(HOOKS.is_initialized());
//! ```

/// Lazily-initialized value cell.
mod cell;

/// Exactly-once action gate.
mod gate;

/// Initializer-bound convenience wrappers.
mod lazy;

/// Static and thread-local declaration macros.
mod macros;

/// Internal synchronization state management.
mod state;

pub use cell::ValueCell;
pub use gate::OnceGate;
pub use lazy::{LazyAction, LazyValue};
