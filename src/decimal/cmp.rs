// ============================================================================
// Decimal Comparison
// Numeric ordering, equality and hashing
// ============================================================================

use super::Decimal;
use crate::numeric::{Coefficient, Word256, POW10};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Compares `|d|` and `|e|` at the larger of the two scales.
fn cmp_magnitude(d: &Decimal, e: &Decimal) -> Ordering {
    if let (Coefficient::Exact(a), Coefficient::Exact(b)) = (&d.coef, &e.coef) {
        return match d.scale.cmp(&e.scale) {
            Ordering::Equal => a.cmp(b),
            Ordering::Less => {
                let (hi, lo) = a.widening_mul(POW10[usize::from(e.scale - d.scale)]);
                Word256::new(hi, lo).cmp_word128(*b)
            },
            Ordering::Greater => {
                let (hi, lo) = b.widening_mul(POW10[usize::from(d.scale - e.scale)]);
                Word256::new(hi, lo).cmp_word128(*a).reverse()
            },
        };
    }

    super::fallback("cmp");
    match d.scale.cmp(&e.scale) {
        Ordering::Equal => d.coef.cmp(&e.coef),
        Ordering::Less => d
            .coef
            .mul_pow10(u32::from(e.scale - d.scale))
            .cmp(&e.coef),
        Ordering::Greater => d
            .coef
            .cmp(&e.coef.mul_pow10(u32::from(d.scale - e.scale))),
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => cmp_magnitude(self, other).reverse(),
            (false, false) => cmp_magnitude(self, other),
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

/// Hashes the trimmed form so numerically equal values hash alike.
impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let t = self.trimmed();
        t.neg.hash(state);
        t.scale.hash(state);
        t.coef.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn d(s: &str) -> Decimal {
        Decimal::must_parse(s)
    }

    #[test]
    fn test_ordering() {
        assert!(d("1.5") > d("1.49"));
        assert!(d("-1.5") < d("-1.49"));
        assert!(d("-0.1") < Decimal::ZERO);
        assert!(Decimal::ZERO < d("0.0000000000000000001"));
        assert_eq!(d("1.50"), d("1.5"));
        assert_eq!(d("1.50").cmp(&d("1.5")), Ordering::Equal);
        assert_eq!(d("2").max(d("3.1")), d("3.1"));
        assert_eq!(d("2").min(d("-3.1")), d("-3.1"));
    }

    #[test]
    fn test_ordering_at_width_limit() {
        // scaling the lower-precision side needs more than 128 bits
        let wide = d("340282366920938463463374607431768211455");
        let narrow = d("0.0000000000000000001");
        assert!(wide > narrow);
        assert!(wide.neg() < narrow.neg());

        let huge = &wide + &wide;
        assert!(huge.coefficient().is_big());
        assert!(huge > wide);
        assert!(huge.neg() < wide.neg());
        assert_eq!(&huge - &wide, wide);
    }

    #[test]
    fn test_hash_is_numeric() {
        let mut set = HashSet::new();
        set.insert(d("1.5"));
        assert!(set.contains(&d("1.50000")));
        assert!(!set.contains(&d("-1.5")));
        set.insert(d("-0"));
        assert!(set.contains(&Decimal::ZERO));
    }
}
