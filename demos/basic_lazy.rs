use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use lazy_once::ValueCell;

static BUILDS: AtomicUsize = AtomicUsize::new(0);
static SQUARES: ValueCell<Vec<u64>> = ValueCell::new();

/// Builds the table on first call; later callers reuse the cached one.
fn squares() -> &'static [u64] {
   SQUARES.get_or_init(|| {
      BUILDS.fetch_add(1, Ordering::Relaxed);
      println!("building table...");
      (0..1024).map(|n| n * n).collect()
   })
}

fn main() {
   let workers: Vec<_> = (0..4)
      .map(|i| {
         thread::spawn(move || {
            let table = squares();
            println!("worker {i}: squares[10] = {}", table[10]);
            table[10]
         })
      })
      .collect();

   for worker in workers {
      assert_eq!(worker.join().unwrap(), 100);
   }

   // Four workers raced, one build happened
   assert_eq!(BUILDS.load(Ordering::Relaxed), 1);
   assert!(SQUARES.is_initialized());
   println!("table built {} time(s)", BUILDS.load(Ordering::Relaxed));
}
