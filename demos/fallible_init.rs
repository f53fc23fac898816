use std::num::ParseIntError;

use lazy_once::ValueCell;

static WORKER_COUNT: ValueCell<usize> = ValueCell::new();

/// Parses the worker count once; a parse failure leaves the cell empty so a
/// corrected value can be tried later.
fn worker_count(raw: &str) -> Result<usize, ParseIntError> {
   WORKER_COUNT.get_or_try_init(|| {
      println!("parsing {raw:?}...");
      raw.parse()
   }).copied()
}

fn main() {
   // A bad value fails and rolls the cell back
   let err = worker_count("eight").unwrap_err();
   println!("rejected: {err}");
   assert!(!WORKER_COUNT.is_initialized());

   // The retry initializes the cell for good
   assert_eq!(worker_count("8").unwrap(), 8);
   assert!(WORKER_COUNT.is_initialized());

   // Once cached, even a bad input returns the stored value unharmed
   assert_eq!(worker_count("not a number").unwrap(), 8);
   println!("worker count: {}", *WORKER_COUNT);
}
