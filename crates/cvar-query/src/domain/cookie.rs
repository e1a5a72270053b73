//! # Cookie Allocator
//!
//! Process-wide source of correlation cookies for user queries.
//!
//! One counter is shared by every slot and every query. It starts at zero
//! when the process starts and only moves forward, so the first cookie
//! issued is 1 and no two issued cookies are equal.
//!
//! The counter wraps after `i32::MAX` increments and would then collide with
//! the sentinel cookies. At one query per millisecond that takes about
//! 25 days of continuous querying; this is an accepted limitation.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, OnceLock};

use super::value_objects::Cookie;

static GLOBAL_COOKIES: OnceLock<Arc<CookieAllocator>> = OnceLock::new();

/// Monotonic cookie counter.
#[derive(Debug, Default)]
pub struct CookieAllocator {
    counter: AtomicI32,
}

impl CookieAllocator {
    /// Create a counter that will issue 1 next.
    pub const fn new() -> Self {
        Self {
            counter: AtomicI32::new(0),
        }
    }

    /// The process-wide allocator.
    pub fn global() -> Arc<CookieAllocator> {
        Arc::clone(GLOBAL_COOKIES.get_or_init(|| Arc::new(CookieAllocator::new())))
    }

    /// Issue the next cookie.
    pub fn next(&self) -> Cookie {
        let previous = self.counter.fetch_add(1, Ordering::Relaxed);
        Cookie::new(previous.wrapping_add(1))
    }
}
