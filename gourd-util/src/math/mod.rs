use num_traits::{PrimInt, Zero};

pub mod position;
pub mod vector2;
pub mod vector3;

/// Converts a world coordinate to the corresponding chunk-section coordinate.
pub const fn get_section_cord(coord: i32) -> i32 {
    coord >> 4
}

/// Position of a coordinate inside its 16-block section or chunk.
pub const fn get_local_cord(coord: i32) -> i32 {
    coord & 15
}

#[inline]
pub fn floor_mod<T>(x: T, y: T) -> T
where
    T: PrimInt + Zero,
{
    let rem = x % y;
    if (x ^ y) < T::zero() && rem != T::zero() {
        rem + y
    } else {
        rem
    }
}
