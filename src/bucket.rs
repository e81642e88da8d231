/// The token state of a gate.
///
/// Only ever touched from inside the controller task, which is what makes
/// it safe to mutate without any locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Bucket {
    /// Number of tokens restored on every refill.
    capacity: u64,
    /// Number of tokens left before the next refill.
    ///
    /// Always `<= capacity`.
    remaining: u64,
}

impl Bucket {
    /// Construct a full bucket.
    pub(crate) const fn new(capacity: u64) -> Self {
        Self {
            capacity,
            remaining: capacity,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> u64 {
        self.capacity
    }

    #[inline]
    pub(crate) fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Reset the bucket to full capacity.
    ///
    /// Tokens left over from the previous interval do not carry over.
    #[inline]
    pub(crate) fn refill(&mut self) {
        self.remaining = self.capacity;
    }

    /// Test if `count` tokens could be taken right now.
    #[inline]
    pub(crate) fn fits(&self, count: u64) -> bool {
        count <= self.remaining
    }

    /// Try to take `count` tokens, returning `true` if they were deducted.
    pub(crate) fn try_take(&mut self, count: u64) -> bool {
        if !self.fits(count) {
            return false;
        }

        self.remaining -= count;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::Bucket;

    #[test]
    fn test_starts_full() {
        let bucket = Bucket::new(10);
        assert_eq!(bucket.capacity(), 10);
        assert_eq!(bucket.remaining(), 10);
    }

    #[test]
    fn test_take_and_refill() {
        let mut bucket = Bucket::new(10);

        assert!(bucket.try_take(4));
        assert!(bucket.try_take(6));
        assert_eq!(bucket.remaining(), 0);
        assert!(!bucket.try_take(1));

        bucket.refill();
        assert_eq!(bucket.remaining(), 10);
    }

    #[test]
    fn test_failed_take_leaves_state() {
        let mut bucket = Bucket::new(5);

        assert!(bucket.try_take(3));
        assert!(!bucket.try_take(3));
        assert_eq!(bucket.remaining(), 2);
        assert!(bucket.try_take(2));
    }

    #[test]
    fn test_refill_does_not_accumulate() {
        let mut bucket = Bucket::new(3);

        bucket.refill();
        bucket.refill();
        assert_eq!(bucket.remaining(), 3);

        assert!(bucket.try_take(1));
        bucket.refill();
        assert_eq!(bucket.remaining(), 3);
    }

    #[test]
    fn test_remaining_never_exceeds_capacity() {
        let mut bucket = Bucket::new(7);

        for count in [1, 7, 3, 0, 8, 2, 2, 5] {
            bucket.try_take(count);
            assert!(bucket.remaining() <= bucket.capacity());

            if count % 2 == 0 {
                bucket.refill();
                assert!(bucket.remaining() <= bucket.capacity());
            }
        }
    }
}
