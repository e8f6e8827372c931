//! Testing and asserting approximate equality.

use core::iter::zip;

/// Trait for comparing values for approximate equality.
///
/// Floating-point rounding means exact comparison is rarely the right tool
/// when checking computed results. Two values are considered approximately
/// equal if their difference is at most an epsilon scaled by the magnitude
/// of the compared values.
pub trait ApproxEq<Other: ?Sized = Self, Epsilon = Self> {
    /// Returns whether `self` and `other` are approximately equal, using
    /// the epsilon from [`Self::relative_epsilon`].
    fn approx_eq(&self, other: &Other) -> bool {
        self.approx_eq_eps(other, &Self::relative_epsilon())
    }

    /// Returns whether `self` and `other` are approximately equal, using
    /// the relative epsilon `rel_eps`.
    fn approx_eq_eps(&self, other: &Other, rel_eps: &Epsilon) -> bool;

    /// Returns the default relative epsilon.
    fn relative_epsilon() -> Epsilon;
}

impl ApproxEq for f32 {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &Self) -> bool {
        let diff = (self - other).abs();
        diff <= *rel_eps * self.abs().max(1.0)
    }

    fn relative_epsilon() -> Self {
        1e-6
    }
}

impl<E, T: Sized + ApproxEq<T, E>> ApproxEq<Self, E> for [T] {
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.len() == other.len()
            && zip(self, other).all(|(s, o)| s.approx_eq_eps(o, rel_eps))
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

impl<E, T: Sized + ApproxEq<T, E>, const N: usize> ApproxEq<Self, E>
    for [T; N]
{
    fn approx_eq_eps(&self, other: &Self, rel_eps: &E) -> bool {
        self.as_slice().approx_eq_eps(other, rel_eps)
    }
    fn relative_epsilon() -> E {
        T::relative_epsilon()
    }
}

/// Asserts that two values are approximately equal.
///
/// The left operand must have an applicable [`ApproxEq`] impl and both
/// operands must impl `Debug`. An epsilon other than the default can be
/// given with `eps = …`.
///
/// # Examples
/// ```
/// # use softrast_core::assert_approx_eq;
/// assert_ne!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(100.0, 101.0, eps = 0.01);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        match (&$a, &$b) {
            (a, b) => {
                use $crate::math::approx::ApproxEq;
                assert!(
                    ApproxEq::approx_eq(a, b),
                    "assertion failed: `{a:?} ≅ {b:?}`"
                )
            }
        }
    };
    ($a:expr, $b:expr, eps = $eps:expr) => {
        match (&$a, &$b) {
            (a, b) => {
                use $crate::math::approx::ApproxEq;
                assert!(
                    ApproxEq::approx_eq_eps(a, b, &$eps),
                    "assertion failed: `{a:?} ≅ {b:?}` (eps = {:?})",
                    $eps
                )
            }
        }
    };
}
