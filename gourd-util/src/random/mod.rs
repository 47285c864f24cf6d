pub mod legacy_rand;

pub trait RandomImpl {
    fn next_i32(&mut self) -> i32;

    /// Uniform value in `0..bound`. `bound` must be positive.
    fn next_bounded_i32(&mut self, bound: i32) -> i32;

    fn next_inbetween_i32(&mut self, min: i32, max: i32) -> i32 {
        self.next_bounded_i32(max - min + 1) + min
    }

    fn next_i64(&mut self) -> i64;

    fn next_bool(&mut self) -> bool;

    fn next_f32(&mut self) -> f32;

    fn next_f64(&mut self) -> f64;

    fn skip(&mut self, count: i32) {
        for _ in 0..count {
            self.next_i64();
        }
    }
}
