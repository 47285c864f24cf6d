use gourd_util::{
    math::vector2::Vector2,
    random::{legacy_rand::LegacyRand, RandomImpl},
};

const SLIME_CHUNK_SALT: i64 = 987_234_911;

/// Whether slimes can spawn in this chunk outside of swamps. Bit-compatible with the
/// vanilla seed mixing, including 32 bit overflow of the intermediate products.
pub fn is_slime_chunk(world_seed: i64, chunk: Vector2<i32>) -> bool {
    let Vector2 { x, z } = chunk;
    let seed = world_seed
        .wrapping_add(x.wrapping_mul(x).wrapping_mul(4_987_142) as i64)
        .wrapping_add(x.wrapping_mul(5_947_611) as i64)
        .wrapping_add((z.wrapping_mul(z) as i64).wrapping_mul(4_392_871))
        .wrapping_add(z.wrapping_mul(389_711) as i64)
        ^ SLIME_CHUNK_SALT;

    LegacyRand::from_seed(seed).next_bounded_i32(10) == 0
}

#[cfg(test)]
mod tests {
    use gourd_util::math::vector2::Vector2;

    use super::is_slime_chunk;

    #[test]
    fn deterministic() {
        for x in -20..20 {
            for z in -20..20 {
                let pos = Vector2::new(x, z);
                assert_eq!(is_slime_chunk(12345, pos), is_slime_chunk(12345, pos));
            }
        }
    }

    #[test]
    fn matches_java_random() {
        // Expected values from java.util.Random with the vanilla seed mixing
        for (seed, x, z, expected) in [
            (0, -5, 5, true),
            (0, -2, 0, true),
            (0, 0, 0, false),
            (0, 1, 1, false),
            // x * x * 0x4c1906 overflows an i32 here
            (0, 40_013, -3, true),
            (0, 40_014, -3, false),
            (12345, -4, 0, true),
            (12345, 0, -2, true),
            (12345, 0, 0, false),
        ] {
            assert_eq!(
                is_slime_chunk(seed, Vector2::new(x, z)),
                expected,
                "seed {seed} at {x} {z}"
            );
        }
    }

    #[test]
    fn about_one_in_ten() {
        let slime_chunks = (-50..50)
            .flat_map(|x| (-50..50).map(move |z| Vector2::new(x, z)))
            .filter(|pos| is_slime_chunk(-4_172_144_997_902_289_642, *pos))
            .count();

        // 10_000 chunks, expect roughly 1_000
        assert!((800..=1200).contains(&slime_chunks), "{slime_chunks}");
    }

    #[test]
    fn depends_on_seed() {
        let differing = (0..200)
            .map(|x| Vector2::new(x, -x))
            .filter(|pos| is_slime_chunk(0, *pos) != is_slime_chunk(1, *pos))
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn huge_coordinates_do_not_overflow() {
        let far = Vector2::new(i32::MAX, i32::MIN);
        let _ = is_slime_chunk(i64::MIN, far);
    }
}
