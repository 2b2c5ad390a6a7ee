// ============================================================================
// Mantissa Rounding
// Bring a value down to a bit budget under a rounding policy
// ============================================================================

use super::policy::{RoundingPolicy, Ternary};
use crate::numeric::{Float, Precision};
use astro_float::{Word, WORD_BIT_SIZE};
use smallvec::SmallVec;

type Words = SmallVec<[Word; 8]>;

/// Round `value` to `precision` significant bits.
///
/// Returns the rounded value, tagged with `precision`, and the direction of
/// the rounding error. Zero, infinities and NaN are returned unchanged with
/// [`Ternary::Exact`].
///
/// # Example
/// ```
/// use arbmath::numeric::{Float, Precision};
/// use arbmath::rounding::{round_to_precision, RoundingPolicy, Ternary};
///
/// let x = Float::from_i64(11, Precision::new(8).unwrap()); // 0b1011
/// let p = Precision::new(3).unwrap();
/// let (r, t) = round_to_precision(&x, p, RoundingPolicy::NearestTiesEven);
/// assert_eq!(r.to_f64(), 12.0);
/// assert_eq!(t, Ternary::RoundedUp);
/// ```
pub fn round_to_precision(
    value: &Float,
    precision: Precision,
    policy: RoundingPolicy,
) -> (Float, Ternary) {
    round_to_bits(value, precision.bits() as i64, policy, precision)
}

/// Keep the `keep` most significant mantissa bits of `value`.
///
/// `keep` may be zero or negative, in which case the value lies entirely below
/// the kept unit and rounds either to zero or to one unit. Integer rounding
/// passes the binary exponent as `keep`.
pub(crate) fn round_to_bits(
    value: &Float,
    keep: i64,
    policy: RoundingPolicy,
    tag: Precision,
) -> (Float, Ternary) {
    let Some(raw) = value.raw_mantissa() else {
        return (value.clone().retag(tag), Ternary::Exact);
    };

    let total = (raw.words.len() * WORD_BIT_SIZE) as i64;
    if keep >= total {
        return (value.clone().retag(tag), Ternary::Exact);
    }

    let negative = raw.negative;

    if keep <= 0 {
        // Everything is discarded. With keep == 0 the first discarded bit is
        // the leading mantissa bit, which is always set.
        let round_bit = keep == 0;
        let sticky = keep < 0 || has_bits_below(raw.words, total as usize - 1);
        let increment = policy.increments(negative, round_bit, sticky, false);
        let rounded = if increment {
            // one unit of the kept position: 2^(exponent - keep)
            Float::half_power(negative, raw.exponent - keep + 1, tag)
        } else if negative {
            Float::zero(tag).neg()
        } else {
            Float::zero(tag)
        };
        return (rounded, direction(negative, increment));
    }

    let cut = (total - keep) as usize;
    let round_bit = bit(raw.words, cut - 1);
    let sticky = has_bits_below(raw.words, cut - 1);
    let lsb = bit(raw.words, cut);

    if !round_bit && !sticky {
        let (words, exponent) = truncate(raw.words, cut, raw.exponent);
        return (
            Float::from_raw(&words, negative, exponent, false, tag),
            Ternary::Exact,
        );
    }

    let increment = policy.increments(negative, round_bit, sticky, lsb);
    let (mut words, mut exponent) = truncate(raw.words, cut, raw.exponent);
    if increment && add_unit(&mut words, cut % WORD_BIT_SIZE) {
        // carry out of the top word: mantissa became 1.000.., renormalize
        let top = words.len() - 1;
        words[top] = 1 << (WORD_BIT_SIZE - 1);
        exponent += 1;
    }

    (
        Float::from_raw(&words, negative, exponent, true, tag),
        direction(negative, increment),
    )
}

/// Ternary for an inexact rounding: incrementing the magnitude moves a
/// positive value up and a negative value down.
#[inline]
fn direction(negative: bool, increment: bool) -> Ternary {
    if increment != negative {
        Ternary::RoundedUp
    } else {
        Ternary::RoundedDown
    }
}

#[inline]
fn bit(words: &[Word], index: usize) -> bool {
    (words[index / WORD_BIT_SIZE] >> (index % WORD_BIT_SIZE)) & 1 == 1
}

/// Whether any bit strictly below `index` is set.
fn has_bits_below(words: &[Word], index: usize) -> bool {
    let word = index / WORD_BIT_SIZE;
    let offset = index % WORD_BIT_SIZE;
    if words[..word].iter().any(|&w| w != 0) {
        return true;
    }
    if offset == 0 {
        return false;
    }
    let mask: Word = (1 << offset) - 1;
    words[word] & mask != 0
}

/// Drop every bit below `cut`, discarding whole low words that become zero.
fn truncate(words: &[Word], cut: usize, exponent: i64) -> (Words, i64) {
    let first = cut / WORD_BIT_SIZE;
    let offset = cut % WORD_BIT_SIZE;
    let mut kept: Words = words[first..].iter().copied().collect();
    if offset != 0 {
        let mask: Word = !((1 << offset) - 1);
        kept[0] &= mask;
    }
    (kept, exponent)
}

/// Add one unit at bit `offset` of the lowest word. Returns the carry out.
fn add_unit(words: &mut [Word], offset: usize) -> bool {
    let mut addend: Word = 1 << offset;
    for word in words.iter_mut() {
        let (sum, carry) = word.overflowing_add(addend);
        *word = sum;
        if !carry {
            return false;
        }
        addend = 1;
    }
    true
}
