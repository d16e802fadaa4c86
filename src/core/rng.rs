//! Tiny, fast LCG for picking encouragement lines.
//! Avoids rand dependency

#[derive(Clone)]
pub struct Lcg(u64);

impl Lcg {
    #[must_use]
    pub fn seed(seed: u64) -> Self {
        Self(seed)
    }

    pub fn seed_from_time() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        // a clock before 1970 just yields a fixed seed
        #[allow(clippy::cast_possible_truncation)]
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0x5EED, |d| d.as_nanos() as u64);
        Self(nanos)
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1);
        (self.0 >> 32) as u32
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    #[inline]
    pub fn below(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        // widening multiply keeps the result unbiased enough for ≤ 2^32 items
        ((u64::from(self.next_u32()) * len as u64) >> 32) as usize
    }

    /// Pick one element of a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.below(items.len()))
        }
    }
}
