use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lazy_once::{static_lazy, static_lazy_action, thread_local_lazy};

static ANSWER_INITS: AtomicUsize = AtomicUsize::new(0);

static_lazy! {
   /// Initialized on first access, process-wide.
   static ANSWER: u32 = {
      ANSWER_INITS.fetch_add(1, Ordering::SeqCst);
      6 * 7
   };
}

#[test]
fn test_static_lazy_initializes_on_first_access() {
   assert_eq!(*ANSWER.get(), 42);
   assert_eq!(*ANSWER.get(), 42);
   assert_eq!(ANSWER_INITS.load(Ordering::SeqCst), 1);
}

static SHARED_INITS: AtomicUsize = AtomicUsize::new(0);

static_lazy! {
   static SHARED: usize = {
      SHARED_INITS.fetch_add(1, Ordering::SeqCst);
      thread::sleep(Duration::from_millis(20));
      7
   };
}

#[test]
fn test_static_lazy_is_shared_across_threads() {
   let threads: Vec<_> = (0..8).map(|_| thread::spawn(|| *SHARED.get())).collect();
   for handle in threads {
      assert_eq!(handle.join().unwrap(), 7);
   }
   assert_eq!(SHARED_INITS.load(Ordering::SeqCst), 1);
}

static TLS_INITS: AtomicUsize = AtomicUsize::new(0);

thread_local_lazy! {
   static PER_THREAD: usize = TLS_INITS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn test_thread_local_lazy_is_per_thread() {
   // Repeated access on one thread initializes once
   let first = PER_THREAD.with(|v| *v.get());
   let again = PER_THREAD.with(|v| *v.get());
   assert_eq!(first, again);

   // Every thread gets its own instance, initialized independently
   let handles: Vec<_> = (0..4)
      .map(|_| thread::spawn(|| PER_THREAD.with(|v| *v.get())))
      .collect();
   let mut seen = vec![first];
   for handle in handles {
      seen.push(handle.join().unwrap());
   }
   seen.sort_unstable();
   seen.dedup();
   assert_eq!(seen.len(), 5);
   assert_eq!(TLS_INITS.load(Ordering::SeqCst), 5);
}

static ACTION_RUNS: AtomicUsize = AtomicUsize::new(0);

static_lazy_action! {
   static BOOTSTRAP = ACTION_RUNS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn test_static_lazy_action_fires_once() {
   assert!(!BOOTSTRAP.is_initialized());
   BOOTSTRAP.call();
   BOOTSTRAP.call();
   assert!(BOOTSTRAP.is_initialized());
   assert_eq!(ACTION_RUNS.load(Ordering::SeqCst), 1);
}
