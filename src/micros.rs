use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Signed microseconds of resolved absolute time.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Micros(i64);

impl Micros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    pub const fn new(microseconds: i64) -> Self {
        Self(microseconds)
    }

    /// Returns the microseconds as an i64
    pub const fn us(&self) -> i64 {
        self.0
    }

    /// Returns seconds
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }
}

impl Add for Micros {
    type Output = Micros;
    fn add(self, rhs: Self) -> Self::Output {
        Micros(self.0 + rhs.0)
    }
}

impl AddAssign for Micros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Micros {
    type Output = Micros;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Micros {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
