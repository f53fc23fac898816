use std::sync::atomic::{AtomicUsize, Ordering};

use lazy_once::{static_lazy, static_lazy_action, thread_local_lazy};

static_lazy! {
   /// Computed on first access, shared by every thread.
   static GREETING: String = format!("hello from pid {}", std::process::id());
}

thread_local_lazy! {
   static THREAD_NAME: String = format!("{:?}", std::thread::current().id());
}

static SETUP_RUNS: AtomicUsize = AtomicUsize::new(0);

static_lazy_action! {
   static SETUP = SETUP_RUNS.fetch_add(1, Ordering::Relaxed);
}

fn main() {
   SETUP.call();
   SETUP.call();
   assert_eq!(SETUP_RUNS.load(Ordering::Relaxed), 1);
   println!("setup ran once");

   println!("{}", *GREETING.get());

   let threads: Vec<_> = (0..3)
      .map(|_| {
         std::thread::spawn(|| {
            // Each thread initializes its own instance
            THREAD_NAME.with(|name| println!("worker is {}", name.get()));
            // The process-wide static is shared
            println!("worker sees: {}", *GREETING.get());
         })
      })
      .collect();

   for t in threads {
      t.join().unwrap();
   }
}
