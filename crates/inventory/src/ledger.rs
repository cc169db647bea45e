//! The stock fold and the rule guarding it.

use backshop_core::{DomainError, DomainResult, ItemId};

use crate::movement::Movement;

/// Current stock of an item: the signed sum of its movements.
///
/// Zero when the item has no movements. Storage backends may express the same
/// fold natively (e.g. a SQL aggregate); this is the reference definition and
/// what the in-memory ledger runs.
pub fn stock_of(item_id: ItemId, movements: &[Movement]) -> i64 {
    movements
        .iter()
        .filter(|m| m.item_id == item_id)
        .map(Movement::signed_quantity)
        .sum()
}

/// Admission rule for any write that consumes stock.
///
/// Callers must hold whatever serialization the storage layer provides for
/// this item between reading `available` and committing, so the fold cannot
/// disagree with a concurrently committing writer.
pub fn ensure_covers(item_id: ItemId, available: i64, requested: u32) -> DomainResult<()> {
    if available < i64::from(requested) {
        return Err(DomainError::InsufficientStock {
            item_id,
            requested,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{Direction, MovementDraft};
    use backshop_core::MovementId;

    fn movement(id: i64, item: i64, qty: u32, direction: Direction) -> Movement {
        MovementDraft::new(ItemId::new(item), qty, direction).into_movement(MovementId::new(id))
    }

    #[test]
    fn fold_of_single_top_up() {
        let ledger = vec![movement(1, 1, 10, Direction::TopUp)];
        assert_eq!(stock_of(ItemId::new(1), &ledger), 10);
    }

    #[test]
    fn fold_nets_withdrawals_against_top_ups() {
        let ledger = vec![
            movement(1, 1, 10, Direction::TopUp),
            movement(2, 1, 4, Direction::Withdrawal),
        ];
        assert_eq!(stock_of(ItemId::new(1), &ledger), 6);
    }

    #[test]
    fn fold_is_scoped_to_the_item() {
        let ledger = vec![
            movement(1, 1, 10, Direction::TopUp),
            movement(2, 2, 7, Direction::TopUp),
            movement(3, 2, 3, Direction::Withdrawal),
        ];
        assert_eq!(stock_of(ItemId::new(1), &ledger), 10);
        assert_eq!(stock_of(ItemId::new(2), &ledger), 4);
        assert_eq!(stock_of(ItemId::new(3), &ledger), 0);
    }

    #[test]
    fn covers_rejects_when_short() {
        let err = ensure_covers(ItemId::new(1), 6, 7).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                item_id: ItemId::new(1),
                requested: 7,
                available: 6,
            }
        );
    }

    #[test]
    fn covers_admits_exact_fit() {
        assert!(ensure_covers(ItemId::new(1), 6, 6).is_ok());
        assert!(ensure_covers(ItemId::new(1), 0, 0).is_ok());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_direction() -> impl Strategy<Value = Direction> {
            prop_oneof![Just(Direction::TopUp), Just(Direction::Withdrawal)]
        }

        proptest! {
            /// Property: the fold equals top-ups minus withdrawals, however
            /// the movements are ordered or interleaved with other items.
            #[test]
            fn fold_matches_signed_sums(
                moves in prop::collection::vec((1i64..=3, 0u32..1000, arb_direction()), 0..40)
            ) {
                let ledger: Vec<Movement> = moves
                    .iter()
                    .enumerate()
                    .map(|(i, (item, qty, dir))| {
                        MovementDraft::new(ItemId::new(*item), *qty, *dir)
                            .into_movement(MovementId::new(i as i64 + 1))
                    })
                    .collect();

                for item in 1i64..=3 {
                    let item_id = ItemId::new(item);
                    let tops: i64 = moves
                        .iter()
                        .filter(|(i, _, d)| *i == item && *d == Direction::TopUp)
                        .map(|(_, q, _)| i64::from(*q))
                        .sum();
                    let withdrawals: i64 = moves
                        .iter()
                        .filter(|(i, _, d)| *i == item && *d == Direction::Withdrawal)
                        .map(|(_, q, _)| i64::from(*q))
                        .sum();

                    prop_assert_eq!(stock_of(item_id, &ledger), tops - withdrawals);
                }
            }

            /// Property: a history admitted one movement at a time through
            /// `ensure_covers` never folds to a negative stock.
            #[test]
            fn guarded_histories_never_go_negative(
                moves in prop::collection::vec((0u32..50, arb_direction()), 0..60)
            ) {
                let item_id = ItemId::new(1);
                let mut ledger: Vec<Movement> = Vec::new();

                for (i, (qty, dir)) in moves.into_iter().enumerate() {
                    let draft = MovementDraft::new(item_id, qty, dir);
                    if dir == Direction::Withdrawal {
                        let available = stock_of(item_id, &ledger);
                        if ensure_covers(item_id, available, qty).is_err() {
                            continue;
                        }
                    }
                    ledger.push(draft.into_movement(MovementId::new(i as i64 + 1)));
                    prop_assert!(stock_of(item_id, &ledger) >= 0);
                }
            }
        }
    }
}
