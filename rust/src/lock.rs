//! A minid generator that can be shared across threads.

use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::minid::{Minid, MinidGen, Minids, Mode};
use crate::suffix::{RandSource, ThreadRandom};
use crate::time::{SystemClock, TimeSource};

/// A cloneable handle to one [`MinidGen`] behind a mutex.
///
/// The clock read, the random draw and the duplicate check-and-insert for an
/// id all happen under the same lock, so clones never hand out the same
/// suffix twice.
pub struct LockMinidGen<C = SystemClock, R = ThreadRandom> {
    inner: Arc<Mutex<MinidGen<C, R>>>,
}

impl<C, R> Clone for LockMinidGen<C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl LockMinidGen {
    pub fn new(mode: Mode, suffix_len: usize) -> Result<Self> {
        Ok(Self::from_generator(MinidGen::new(mode, suffix_len)?))
    }
}

impl<C: TimeSource, R: RandSource> LockMinidGen<C, R> {
    pub fn from_generator(generator: MinidGen<C, R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(generator)),
        }
    }

    pub fn next_minid(&self) -> Result<Minid> {
        self.inner.lock()?.next_minid()
    }

    /// Generate `n` minids while holding the lock once.
    pub fn next_n(&self, n: usize) -> Result<Minids> {
        self.inner.lock()?.next_n(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinidError;
    use std::collections::HashSet;
    use std::thread;

    fn poison<T>(m: &Mutex<T>) {
        let _guard = m.lock().unwrap();
        panic!("poison the generator");
    }

    #[test]
    fn test_shared_across_threads_stays_unique() {
        let generator = LockMinidGen::new(Mode::Random, 3).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let g = generator.clone();
                thread::spawn(move || {
                    (0..250)
                        .map(|_| g.next_minid().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 1_000);
    }

    #[test]
    fn test_poisoned_lock_surfaces_as_error() {
        let generator = LockMinidGen::new(Mode::Seconds, 3).unwrap();
        let g = generator.clone();
        let _ = thread::spawn(move || poison(&g.inner)).join();

        assert_eq!(generator.next_minid(), Err(MinidError::LockPoisoned));
        assert!(matches!(generator.next_n(2), Err(MinidError::LockPoisoned)));
    }
}
