//! Fixed-point arithmetic for money and share counts.
//!
//! Balances, prices, and share quantities are stored as `i64` values scaled
//! by 10_000 (1 raw unit = 1/10000 of a currency unit or share). All ledger
//! arithmetic stays in integers; conversion to `f64` exists for display and
//! scoring only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Raw units per whole currency unit / share.
pub const SCALE: i64 = 10_000;

/// Exact integer-scaled quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fixed(i64);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);

    /// Wrap a raw scaled value (`raw` units of 1/10000).
    pub const fn from_raw(raw: i64) -> Self {
        Fixed(raw)
    }

    /// Whole units, exact.
    pub const fn from_int(units: i64) -> Self {
        Fixed(units * SCALE)
    }

    /// Convert from a float at the ingest boundary (rounds to nearest raw unit).
    pub fn from_f64(value: f64) -> Self {
        Fixed((value * SCALE as f64).round() as i64)
    }

    /// Display/scoring-only conversion; never feed the result back into the ledger.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn abs(self) -> Fixed {
        Fixed(self.0.abs())
    }

    /// Fixed-point multiply, rounding half away from zero.
    pub fn mul(self, other: Fixed) -> Fixed {
        let wide = self.0 as i128 * other.0 as i128;
        Fixed(round_div(wide, SCALE as i128))
    }

    /// Fixed-point divide, rounding half away from zero. `other` must be nonzero.
    pub fn div(self, other: Fixed) -> Fixed {
        let (n, d) = if other.0 < 0 {
            (-(self.0 as i128), -(other.0 as i128))
        } else {
            (self.0 as i128, other.0 as i128)
        };
        Fixed(round_div(n * SCALE as i128, d))
    }

    /// Fixed-point divide, truncating toward negative infinity.
    ///
    /// Used for share sizing: `cash.div_floor(price)` never buys more than
    /// cash can cover, where round-to-nearest could.
    pub fn div_floor(self, other: Fixed) -> Fixed {
        let (n, d) = if other.0 < 0 {
            (-(self.0 as i128), -(other.0 as i128))
        } else {
            (self.0 as i128, other.0 as i128)
        };
        Fixed((n * SCALE as i128).div_euclid(d) as i64)
    }
}

/// Divide rounding half away from zero. `d` must be positive.
fn round_div(n: i128, d: i128) -> i64 {
    let half = d / 2;
    let q = if n >= 0 { (n + half) / d } else { (n - half) / d };
    q as i64
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 -= rhs.0;
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Fixed {
        iter.fold(Fixed::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Fixed {
    /// Exact decimal rendering: two places when the value is representable
    /// in cents, all four places otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        if frac % 100 == 0 {
            write!(f, "{sign}{units}.{:02}", frac / 100)
        } else {
            write!(f, "{sign}{units}.{frac:04}")
        }
    }
}

/// Render `numer / denom` as a percentage with one decimal place, e.g. "40.0%".
///
/// Computed entirely in fixed-point: the ratio is scaled to tenths of a
/// percent and rounded once, so 4/10 is exactly "40.0%". A zero denominator
/// renders as "0.0%"; this is a display function and must not panic on a
/// malformed record.
pub fn percent_string(numer: Fixed, denom: Fixed) -> String {
    if denom.is_zero() {
        return "0.0%".to_string();
    }
    let ratio = numer.div(denom);
    // ratio raw units are 1/10000; tenths of a percent are ratio * 1000.
    let tenths = round_div(ratio.raw() as i128 * 1000, SCALE as i128);
    let sign = if tenths < 0 { "-" } else { "" };
    let tenths = tenths.unsigned_abs();
    format!("{sign}{}.{}%", tenths / 10, tenths % 10)
}
