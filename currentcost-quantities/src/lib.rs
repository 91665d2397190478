pub mod energy;
pub mod power;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;

/// Physical quantity tagged with its power and time dimensions.
///
/// Kilowatts are `Quantity<1, 0>`, kilowatt-hours are `Quantity<1, 1>`.
#[derive(
    Clone,
    Copy,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(i32, f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const POWER: isize, const TIME: isize>(pub OrderedFloat<f64>);

impl<const POWER: isize, const TIME: isize> Quantity<POWER, TIME> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    #[must_use]
    pub const fn into_inner(self) -> f64 {
        self.0.0
    }
}

impl<const POWER: isize, const TIME: isize> Mul<f64> for Quantity<POWER, TIME> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const POWER: isize, const TIME: isize> Div<f64> for Quantity<POWER, TIME> {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::{Debug, Formatter};

    use super::*;

    pub type Bare = Quantity<0, 0>;

    impl Debug for Bare {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    #[test]
    fn test_sum() {
        let total: Bare = [Bare::from(1), Bare::from(2), Bare::from(3)].into_iter().sum();
        assert_eq!(total, Bare::from(6));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("001.5".parse::<Bare>().ok(), Some(Bare::from(1.5)));
        assert!("kwhr".parse::<Bare>().is_err());
    }

    #[test]
    fn test_max() {
        assert_eq!(Bare::from(1).max(Bare::from(2)), Bare::from(2));
        assert_eq!(Bare::from(2).max(Bare::from(1)), Bare::from(2));
    }
}
