//! The order-number allocator.
//!
//! Order numbers have the canonical form `O<digits>`, with no zero padding;
//! widths grow naturally past `O9`, `O99`, and so on. Allocation derives the
//! next number from the last issued one. A stored number that does not match
//! the expected shape is corruption and is never silently recovered.

use core::str::FromStr;

use backshop_core::{DomainError, DomainResult};

/// A canonical, sequential order number.
///
/// This type only ever holds a valid sequence position; the stored order
/// string on an [`crate::Order`] may carry caller-supplied casing after an
/// update and therefore stays a plain `String`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderNumber(u64);

impl OrderNumber {
    /// The seed when no order has ever been issued.
    ///
    /// The original left the empty-history case undefined; starting at `O1`
    /// is a deliberate decision here.
    pub const FIRST: OrderNumber = OrderNumber(1);

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Allocate the number following `last`, or [`Self::FIRST`] on an empty
    /// history.
    pub fn next(last: Option<&OrderNumber>) -> OrderNumber {
        match last {
            None => Self::FIRST,
            Some(n) => OrderNumber(n.0 + 1),
        }
    }
}

impl core::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "O{}", self.0)
    }
}

impl FromStr for OrderNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let digits = s
            .strip_prefix('O')
            .ok_or_else(|| DomainError::corruption(format!("order number {s:?} lacks O prefix")))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::corruption(format!(
                "order number {s:?} is not O<digits>"
            )));
        }

        let value = digits
            .parse::<u64>()
            .map_err(|e| DomainError::corruption(format!("order number {s:?}: {e}")))?;

        Ok(OrderNumber(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_after_o10_is_o11() {
        let last: OrderNumber = "O10".parse().unwrap();
        assert_eq!(OrderNumber::next(Some(&last)).to_string(), "O11");
    }

    #[test]
    fn width_grows_past_o99() {
        let last: OrderNumber = "O99".parse().unwrap();
        assert_eq!(OrderNumber::next(Some(&last)).to_string(), "O100");
    }

    #[test]
    fn empty_history_seeds_o1() {
        assert_eq!(OrderNumber::next(None), OrderNumber::FIRST);
        assert_eq!(OrderNumber::FIRST.to_string(), "O1");
    }

    #[test]
    fn malformed_stored_numbers_are_corruption() {
        for s in ["10", "X10", "O", "Oten", "o10", "O-1", "O 1"] {
            let err = s.parse::<OrderNumber>().unwrap_err();
            assert!(
                matches!(err, DomainError::Corruption(_)),
                "expected corruption for {s:?}, got {err:?}"
            );
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: formatting then parsing is the identity, and the
            /// successor is strictly increasing.
            #[test]
            fn format_parse_round_trip(n in 1u64..1_000_000_000) {
                let number = OrderNumber::next(Some(&OrderNumber(n - 1)));
                let reparsed: OrderNumber = number.to_string().parse().unwrap();
                prop_assert_eq!(reparsed, number);
                prop_assert!(reparsed > OrderNumber(n - 1));
            }
        }
    }
}
