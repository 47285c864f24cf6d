use super::RandomImpl;

const MULTIPLIER: i64 = 0x5DEECE66D;
const ADDEND: i64 = 0xB;
const MASK: i64 = (1 << 48) - 1;

/// The 48-bit linear congruential generator used by `java.util.Random`.
///
/// Outputs are bit-for-bit identical to the JVM for the same seed, which matters for
/// seed derived features such as slime chunks.
#[derive(Clone, Debug)]
pub struct LegacyRand {
    seed: i64,
}

impl LegacyRand {
    pub fn from_seed(seed: i64) -> Self {
        Self {
            seed: (seed ^ MULTIPLIER) & MASK,
        }
    }

    pub fn set_seed(&mut self, seed: i64) {
        self.seed = (seed ^ MULTIPLIER) & MASK;
    }

    fn next(&mut self, bits: u32) -> i32 {
        debug_assert!(bits <= 32);
        self.seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(ADDEND) & MASK;
        (self.seed >> (48 - bits)) as i32
    }
}

impl RandomImpl for LegacyRand {
    fn next_i32(&mut self) -> i32 {
        self.next(32)
    }

    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "bound must be positive, got {bound}");

        if (bound & -bound) == bound {
            return ((bound as i64 * self.next(31) as i64) >> 31) as i32;
        }

        loop {
            let bits = self.next(31);
            let value = bits % bound;
            // Rejects the top partial range, overflow is intentional
            if bits.wrapping_sub(value).wrapping_add(bound - 1) >= 0 {
                return value;
            }
        }
    }

    fn next_i64(&mut self) -> i64 {
        let upper = self.next(32) as i64;
        let lower = self.next(32) as i64;
        (upper << 32).wrapping_add(lower)
    }

    fn next_bool(&mut self) -> bool {
        self.next(1) != 0
    }

    fn next_f32(&mut self) -> f32 {
        self.next(24) as f32 / (1 << 24) as f32
    }

    fn next_f64(&mut self) -> f64 {
        let upper = (self.next(26) as i64) << 27;
        let lower = self.next(27) as i64;
        (upper + lower) as f64 * f64::from_bits(0x3CA0000000000000)
    }
}

#[cfg(test)]
mod tests {
    use super::LegacyRand;
    use crate::random::RandomImpl;

    #[test]
    fn matches_jvm_next_int() {
        let mut rand = LegacyRand::from_seed(0);
        assert_eq!(rand.next_i32(), -1155484576);

        let mut rand = LegacyRand::from_seed(42);
        assert_eq!(rand.next_i32(), -1170105035);
    }

    #[test]
    fn matches_jvm_next_long() {
        let mut rand = LegacyRand::from_seed(0);
        assert_eq!(rand.next_i64(), -4962768465676381896);
    }

    #[test]
    fn matches_jvm_bounded() {
        let mut rand = LegacyRand::from_seed(0);
        assert_eq!(rand.next_bounded_i32(10), 0);

        // Power of two bounds take the multiply path
        let mut rand = LegacyRand::from_seed(0);
        assert_eq!(rand.next_bounded_i32(16), 11);
    }

    #[test]
    fn matches_jvm_double_and_bool() {
        let mut rand = LegacyRand::from_seed(0);
        assert!((rand.next_f64() - 0.730967787376657).abs() < 1e-15);

        let mut rand = LegacyRand::from_seed(0);
        assert!(rand.next_bool());
    }

    #[test]
    fn reseeding_restarts_sequence() {
        let mut rand = LegacyRand::from_seed(1234);
        let first = rand.next_i64();
        rand.set_seed(1234);
        assert_eq!(rand.next_i64(), first);
    }

    #[test]
    fn bounded_stays_in_range() {
        let mut rand = LegacyRand::from_seed(-7);
        for _ in 0..1000 {
            let value = rand.next_bounded_i32(7);
            assert!((0..7).contains(&value));
        }
    }
}
