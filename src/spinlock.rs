// SPDX-License-Identifier: MIT OR Apache-2.0
/*!
A spinlock for process-wide bookkeeping.

The registry and the diagnostics sink are touched on handler construction, logger lookup
and the rare failure report.  Critical sections are a map lookup, a counter bump or an
`Arc` clone.

Do not hold this lock across anything that can block.
*/

use std::cell::UnsafeCell;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

pub struct Spinlock<T> {
    data: UnsafeCell<T>,
    locked: AtomicBool,
}

unsafe impl<T: Send> Send for Spinlock<T> {}
unsafe impl<T: Send> Sync for Spinlock<T> {}

impl<T> Spinlock<T> {
    pub const fn new(data: T) -> Self {
        Spinlock {
            data: UnsafeCell::new(data),
            locked: AtomicBool::new(false),
        }
    }

    fn lock(&self) {
        while self
            .locked
            .compare_exchange_weak(false, true, Acquire, Relaxed)
            .is_err()
        {
            // test-and-test-and-set
            while self.locked.load(Relaxed) {
                std::hint::spin_loop();
            }
        }
    }

    fn unlock(&self) {
        self.locked.store(false, Release);
    }

    /// Runs `f` with exclusive access.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        struct Unlock<'a, T>(&'a Spinlock<T>);
        impl<T> Drop for Unlock<'_, T> {
            fn drop(&mut self) {
                self.0.unlock();
            }
        }

        self.lock();
        // releases even if `f` panics
        let _unlock = Unlock(self);
        // SAFETY: the lock is held until `_unlock` drops
        unsafe { f(&mut *self.data.get()) }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Spinlock<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spinlock")
            .field("locked", &self.locked.load(Relaxed))
            .finish_non_exhaustive()
    }
}
