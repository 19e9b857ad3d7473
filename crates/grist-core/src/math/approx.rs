// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Epsilon-tolerant floating point comparisons.
//!
//! Attribute totals are accumulated through repeated vector additions, so
//! exact comparisons against interval endpoints would reject values that
//! are off by a few ulps. Every comparison in the solver goes through the
//! helpers in this module with the shared [`EPS`] tolerance.

use num_traits::Float;

/// The tolerance used for all attribute comparisons in the solver.
pub const EPS: f64 = 1e-9;

/// Returns `true` if `a <= b` within the given tolerance.
///
/// # Examples
///
/// ```rust
/// # use grist_core::math::approx::{approx_le, EPS};
///
/// assert!(approx_le(1.0 + 1e-12, 1.0, EPS));
/// assert!(!approx_le(1.1, 1.0, EPS));
/// ```
#[inline]
pub fn approx_le<F>(a: F, b: F, eps: F) -> bool
where
    F: Float,
{
    a <= b + eps
}

/// Returns `true` if `a >= b` within the given tolerance.
///
/// # Examples
///
/// ```rust
/// # use grist_core::math::approx::{approx_ge, EPS};
///
/// assert!(approx_ge(1.0 - 1e-12, 1.0, EPS));
/// assert!(!approx_ge(0.9, 1.0, EPS));
/// ```
#[inline]
pub fn approx_ge<F>(a: F, b: F, eps: F) -> bool
where
    F: Float,
{
    a >= b - eps
}

/// Returns `true` if `a` and `b` differ by at most the given tolerance.
///
/// # Examples
///
/// ```rust
/// # use grist_core::math::approx::{approx_eq, EPS};
///
/// assert!(approx_eq(0.1 + 0.2, 0.3, EPS));
/// assert!(!approx_eq(0.1, 0.2, EPS));
/// ```
#[inline]
pub fn approx_eq<F>(a: F, b: F, eps: F) -> bool
where
    F: Float,
{
    (a - b).abs() <= eps
}

/// Replaces non-finite values (NaN, ±inf) with zero.
///
/// Malformed catalogue entries are normalized instead of rejected so that
/// the search stays total over well-typed input.
///
/// # Examples
///
/// ```rust
/// # use grist_core::math::approx::finite_or_zero;
///
/// assert_eq!(finite_or_zero(2.5), 2.5);
/// assert_eq!(finite_or_zero(f64::NAN), 0.0);
/// assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
/// ```
#[inline]
pub fn finite_or_zero<F>(value: F) -> F
where
    F: Float,
{
    if value.is_finite() { value } else { F::zero() }
}

/// Rounds `value` to the given number of decimal places.
///
/// Used to stabilize attribute totals for display and identity purposes;
/// re-rounding an already-rounded value is a no-op.
///
/// # Examples
///
/// ```rust
/// # use grist_core::math::approx::round_to;
///
/// assert_eq!(round_to(1.23456, 3), 1.235);
/// assert_eq!(round_to(round_to(1.23456, 3), 3), 1.235);
/// ```
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
