// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate types: the [`Scalar`] abstraction and the fixed-dimension [`Vector`].

use core::cmp::Ordering;
use core::fmt::Debug;
use core::ops::{Add, Div, Index, IndexMut, Mul, Sub};

/// Numeric scalar abstraction for tree coordinates.
///
/// The tree only needs a handful of constants on top of ordinary field arithmetic:
/// zero for bounds checks, one half for the subdivision split, and two for rescaling
/// percentages into a child cell.
pub trait Scalar:
    Copy
    + PartialOrd
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One value for the scalar type.
    fn one() -> Self;

    /// One half, the split point of every cell in percentage space.
    fn half() -> Self;

    /// Two, the rescaling factor from a cell into one of its children.
    fn two() -> Self;
}

impl Scalar for f32 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn half() -> Self {
        0.5
    }

    #[inline]
    fn two() -> Self {
        2.0
    }
}

/// A `D`-dimensional coordinate vector.
///
/// Used for world sizes, entry positions and sizes, and query points. Arithmetic is
/// elementwise; [`Vector::fits_within`] is the componentwise `<=` used for depth selection.
///
/// Floats are assumed to be finite. Comparisons involving NaN evaluate to `false`, so a
/// NaN position or size never passes validation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector<T, const D: usize>([T; D]);

impl<T, const D: usize> Vector<T, D> {
    /// Create a vector from its components.
    pub const fn new(coords: [T; D]) -> Self {
        Self(coords)
    }

    /// Borrow the components.
    pub const fn as_array(&self) -> &[T; D] {
        &self.0
    }

    /// Unwrap into the component array.
    pub fn into_array(self) -> [T; D] {
        self.0
    }
}

impl<T: Copy, const D: usize> Vector<T, D> {
    /// Create a vector with every component set to `value`.
    pub fn splat(value: T) -> Self {
        Self([value; D])
    }
}

impl<T: Scalar, const D: usize> Vector<T, D> {
    /// Componentwise `<=`: true when every component of `self` is at most the matching one of `other`.
    pub fn fits_within(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(&a, &b)| le(a, b))
    }

    /// True when every component is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0.iter().all(|&c| lt(T::zero(), c))
    }

    /// True when every component lies in `[0, bound]` for the matching component of `bound`.
    pub fn is_within_extent(&self, bound: &Self) -> bool {
        self.0
            .iter()
            .zip(bound.0.iter())
            .all(|(&c, &b)| le(T::zero(), c) && le(c, b))
    }
}

impl<T, const D: usize> From<[T; D]> for Vector<T, D> {
    fn from(coords: [T; D]) -> Self {
        Self(coords)
    }
}

impl<T, const D: usize> Index<usize> for Vector<T, D> {
    type Output = T;

    #[inline]
    fn index(&self, dim: usize) -> &T {
        &self.0[dim]
    }
}

impl<T, const D: usize> IndexMut<usize> for Vector<T, D> {
    #[inline]
    fn index_mut(&mut self, dim: usize) -> &mut T {
        &mut self.0[dim]
    }
}

impl<T: Scalar, const D: usize> Mul for Vector<T, D> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|d| self.0[d] * rhs.0[d]))
    }
}

impl<T: Scalar, const D: usize> Mul<T> for Vector<T, D> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        Self(core::array::from_fn(|d| self.0[d] * rhs))
    }
}

impl<T: Scalar, const D: usize> Div for Vector<T, D> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self(core::array::from_fn(|d| self.0[d] / rhs.0[d]))
    }
}

impl<T: Scalar, const D: usize> Div<T> for Vector<T, D> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        Self(core::array::from_fn(|d| self.0[d] / rhs))
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}
