use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use super::vector3::Math;

/// A horizontal pair of coordinates. Chunk positions use `Vector2<i32>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector2<T> {
    pub x: T,
    pub z: T,
}

impl<T: Math + Copy> Vector2<T> {
    pub const fn new(x: T, z: T) -> Self {
        Vector2 { x, z }
    }

    pub fn length_squared(&self) -> T {
        self.x * self.x + self.z * self.z
    }

    pub fn add_raw(&self, x: T, z: T) -> Self {
        Vector2 {
            x: self.x + x,
            z: self.z + z,
        }
    }
}

impl<T: Math + Copy> Add for Vector2<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector2 {
            x: self.x + rhs.x,
            z: self.z + rhs.z,
        }
    }
}

impl<T: Math + Copy> Sub for Vector2<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vector2 {
            x: self.x - rhs.x,
            z: self.z - rhs.z,
        }
    }
}

impl<T> From<(T, T)> for Vector2<T> {
    #[inline(always)]
    fn from((x, z): (T, T)) -> Self {
        Vector2 { x, z }
    }
}

impl<T: fmt::Display> fmt::Display for Vector2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.z)
    }
}
