use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use lazy_once::{LazyAction, LazyValue};

#[test]
fn test_construction_does_not_run_initializer() {
   let counter = AtomicUsize::new(0);
   let lazy = LazyValue::new(|| {
      counter.fetch_add(1, Ordering::SeqCst);
      42
   });

   assert!(!lazy.is_initialized());
   assert_eq!(lazy.try_get(), None);
   assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[test]
fn test_get_computes_once() {
   let counter = AtomicUsize::new(0);
   let lazy = LazyValue::new(|| {
      counter.fetch_add(1, Ordering::SeqCst);
      42
   });

   assert_eq!(*lazy.get(), 42);
   assert_eq!(counter.load(Ordering::SeqCst), 1);

   // Repeated access returns the cached value without re-running
   assert_eq!(*lazy.get(), 42);
   assert_eq!(lazy.try_get(), Some(&42));
   assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_deref_forces_initialization() {
   let lazy = LazyValue::new(|| String::from("forced"));
   assert!(!lazy.is_initialized());
   assert_eq!(lazy.len(), 6);
   assert!(lazy.is_initialized());
}

#[test]
fn test_reset_runs_initializer_again() {
   let counter = AtomicUsize::new(0);
   let mut lazy = LazyValue::new(|| counter.fetch_add(1, Ordering::SeqCst));

   assert_eq!(*lazy.get(), 0);
   lazy.reset();
   assert!(!lazy.is_initialized());
   assert_eq!(lazy.try_get(), None);

   assert_eq!(*lazy.get(), 1);
   assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_shared_lazy_value_initializes_once() {
   let counter = Arc::new(AtomicUsize::new(0));
   let lazy = {
      let counter = Arc::clone(&counter);
      Arc::new(LazyValue::new(move || {
         counter.fetch_add(1, Ordering::SeqCst);
         thread::sleep(Duration::from_millis(20));
         99usize
      }))
   };

   let threads: Vec<_> = (0..8)
      .map(|_| {
         let lazy = Arc::clone(&lazy);
         thread::spawn(move || *lazy.get())
      })
      .collect();

   for handle in threads {
      assert_eq!(handle.join().unwrap(), 99);
   }
   assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_action_runs_at_most_once() {
   let counter = AtomicUsize::new(0);
   let action = LazyAction::new(|| {
      counter.fetch_add(1, Ordering::SeqCst);
   });

   assert!(!action.is_initialized());
   action.call();
   action.call();
   assert!(action.is_initialized());
   assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_action_reset_rearms() {
   let counter = AtomicUsize::new(0);
   let action = LazyAction::new(|| {
      counter.fetch_add(1, Ordering::SeqCst);
   });

   action.call();
   action.reset();
   assert!(!action.is_initialized());

   action.call();
   assert!(action.is_initialized());
   assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_shared_action_runs_once_across_threads() {
   let counter = Arc::new(AtomicUsize::new(0));
   let action = {
      let counter = Arc::clone(&counter);
      Arc::new(LazyAction::new(move || {
         thread::sleep(Duration::from_millis(20));
         counter.fetch_add(1, Ordering::SeqCst);
      }))
   };

   let threads: Vec<_> = (0..8)
      .map(|_| {
         let action = Arc::clone(&action);
         let counter = Arc::clone(&counter);
         thread::spawn(move || {
            action.call();
            // The action completed before any caller returned
            assert_eq!(counter.load(Ordering::SeqCst), 1);
         })
      })
      .collect();

   for handle in threads {
      handle.join().unwrap();
   }
   assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_debug_output() {
   let lazy = LazyValue::new(|| 1);
   assert_eq!(format!("{lazy:?}"), "LazyValue(<uninit>)");
   lazy.get();
   assert_eq!(format!("{lazy:?}"), "LazyValue(1)");

   let action = LazyAction::new(|| {});
   assert_eq!(format!("{action:?}"), "LazyAction { initialized: false }");
}
