use std::num::NonZeroU8;

use gourd_util::math::vector2::Vector2;

/// The chunks an observer keeps watched, a disc of chunks around the one it stands in.
///
/// Watched chunks tick and refuse safe unloads. Chunks outside every area only tick when
/// they are sticky.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchArea {
    pub center: Vector2<i32>,
    pub radius: NonZeroU8,
}

impl WatchArea {
    pub fn new(center: Vector2<i32>, radius: NonZeroU8) -> Self {
        Self { center, radius }
    }

    /// Reports the chunks an observer starts and stops watching when its area moves from
    /// `old` to `new`.
    pub fn diff(
        old: WatchArea,
        new: WatchArea,
        mut entered: impl FnMut(Vector2<i32>),
        mut left: impl FnMut(Vector2<i32>),
    ) {
        new.chunks()
            .into_iter()
            .filter(|chunk| !old.contains(*chunk))
            .for_each(&mut entered);
        old.chunks()
            .into_iter()
            .filter(|chunk| !new.contains(*chunk))
            .for_each(&mut left);
    }

    /// Columns within two chunks of the center always count, further ones by distance
    pub fn contains(&self, chunk: Vector2<i32>) -> bool {
        let dx = ((i64::from(chunk.x) - i64::from(self.center.x)).abs() - 2).max(0);
        let dz = ((i64::from(chunk.z) - i64::from(self.center.z)).abs() - 2).max(0);
        dx * dx + dz * dz < i64::from(self.radius.get()).pow(2)
    }

    /// Half width of the square holding the whole area
    fn reach(&self) -> i32 {
        i32::from(self.radius.get()) + 1
    }

    pub fn chunks(&self) -> Vec<Vector2<i32>> {
        let reach = self.reach();
        let side = (2 * reach + 1) as usize;
        let mut chunks = Vec::with_capacity(side * side);

        for x in self.center.x - reach..=self.center.x + reach {
            for z in self.center.z - reach..=self.center.z + reach {
                let chunk = Vector2::new(x, z);
                if self.contains(chunk) {
                    chunks.push(chunk);
                }
            }
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU8;

    use gourd_util::math::vector2::Vector2;

    use super::WatchArea;

    fn radius(value: u8) -> NonZeroU8 {
        NonZeroU8::new(value).unwrap()
    }

    #[test]
    fn chunks_match_contains() {
        for r in 1..=32 {
            let area = WatchArea::new(Vector2::new(-7, 3), radius(r));
            let chunks = area.chunks();
            assert!(chunks.contains(&area.center));
            assert!(chunks.iter().all(|chunk| area.contains(*chunk)));

            // Nothing outside the scanned square is part of the area
            let reach = area.reach() + 1;
            for offset in -reach..=reach {
                assert!(!area.contains(Vector2::new(area.center.x + reach, area.center.z + offset)));
                assert!(!area.contains(Vector2::new(area.center.x + offset, area.center.z - reach)));
            }
        }
    }

    #[test]
    fn small_radius_covers_neighbours() {
        let area = WatchArea::new(Vector2::new(0, 0), radius(1));
        assert!(area.contains(Vector2::new(1, 0)));
        assert!(area.contains(Vector2::new(2, 2)));
        assert!(!area.contains(Vector2::new(3, 0)));
    }

    #[test]
    fn moving_one_chunk_changes_edges_only() {
        let old = WatchArea::new(Vector2::new(0, 0), radius(4));
        let new = WatchArea::new(Vector2::new(1, 0), radius(4));

        let mut entered = Vec::new();
        let mut left = Vec::new();
        WatchArea::diff(old, new, |c| entered.push(c), |c| left.push(c));

        assert!(!entered.is_empty());
        assert_eq!(entered.len(), left.len());
        assert!(entered.iter().all(|chunk| chunk.x > 0));
        assert!(left.iter().all(|chunk| chunk.x < 1));
    }

    #[test]
    fn far_coordinates() {
        let area = WatchArea::new(Vector2::new(i32::MAX - 1, i32::MIN + 1), radius(2));
        assert!(area.contains(Vector2::new(i32::MAX, i32::MIN)));
        assert!(!area.contains(Vector2::new(i32::MIN, i32::MAX)));
    }
}
