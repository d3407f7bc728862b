//! Arithmetic utilities for balance and threshold calculations.
//!
//! This module provides [`Rounding`] and [`div_round`] for explicit-direction
//! division, [`mul_div`] for fixed-point products that need a 256-bit
//! intermediate, and [`CheckedArithmetic`] for `?`-friendly overflow checks.

mod checked;
mod rounding;

pub use checked::CheckedArithmetic;
pub use rounding::{div_round, mul_div, Rounding};
