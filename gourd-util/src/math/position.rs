use std::fmt;

use num_traits::Euclid;
use serde::{Deserialize, Serialize};

use super::{get_section_cord, vector2::Vector2, vector3::Vector3};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// Aka Block Position
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    pub fn floored(x: f64, y: f64, z: f64) -> Self {
        Self(Vector3::new(
            x.floor() as i32,
            y.floor() as i32,
            z.floor() as i32,
        ))
    }

    /// Splits the position into the chunk it belongs to and the position inside that chunk.
    /// The relative `y` is left untouched.
    pub fn chunk_and_chunk_relative_position(&self) -> (Vector2<i32>, Vector3<i32>) {
        let (z_chunk, z_rem) = self.0.z.div_rem_euclid(&16);
        let (x_chunk, x_rem) = self.0.x.div_rem_euclid(&16);
        let chunk_coordinate = Vector2 {
            x: x_chunk,
            z: z_chunk,
        };

        // Since we divide by 16, remnant can never exceed u8
        let relative = Vector3 {
            x: x_rem,
            z: z_rem,

            y: self.0.y,
        };
        (chunk_coordinate, relative)
    }

    pub const fn chunk_position(&self) -> Vector2<i32> {
        Vector2::new(get_section_cord(self.0.x), get_section_cord(self.0.z))
    }

    /// Inverse of `chunk_and_chunk_relative_position`
    pub const fn from_chunk_relative(chunk: Vector2<i32>, x: i32, y: i32, z: i32) -> Self {
        Self::new(chunk.x * 16 + x, y, chunk.z * 16 + z)
    }

    pub fn offset(&self, offset: Vector3<i32>) -> Self {
        BlockPos(self.0 + offset)
    }

    pub fn up(&self) -> Self {
        self.offset(Vector3::new(0, 1, 0))
    }

    pub fn down(&self) -> Self {
        self.offset(Vector3::new(0, -1, 0))
    }

    pub fn to_f64(&self) -> Vector3<f64> {
        Vector3::new(
            self.0.x as f64 + 0.5,
            self.0.y as f64,
            self.0.z as f64 + 0.5,
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.0.x, self.0.y, self.0.z)
    }
}

#[cfg(test)]
mod tests {
    use super::BlockPos;
    use crate::math::{vector2::Vector2, vector3::Vector3};

    #[test]
    fn negative_positions_map_to_negative_chunks() {
        let pos = BlockPos::new(-1, 70, -17);
        let (chunk, relative) = pos.chunk_and_chunk_relative_position();

        assert_eq!(chunk, Vector2::new(-1, -2));
        assert_eq!(relative, Vector3::new(15, 70, 15));
        assert_eq!(pos.chunk_position(), chunk);
    }

    #[test]
    fn relative_round_trip() {
        let chunk = Vector2::new(-3, 5);
        let pos = BlockPos::from_chunk_relative(chunk, 4, -64, 9);

        assert_eq!(pos, BlockPos::new(-44, -64, 89));
        let (back, relative) = pos.chunk_and_chunk_relative_position();
        assert_eq!(back, chunk);
        assert_eq!(relative, Vector3::new(4, -64, 9));
    }

    #[test]
    fn floored_handles_negative_fractions() {
        assert_eq!(BlockPos::floored(-0.5, 64.9, 3.2), BlockPos::new(-1, 64, 3));
    }
}
