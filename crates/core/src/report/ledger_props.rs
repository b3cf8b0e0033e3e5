//! Property-based tests for the line item ledger.

use proptest::prelude::*;
use proptest::sample::Index;
use rust_decimal::Decimal;

use crate::report::line_items::{ExpenseLineItem, LineItemInput};
use crate::report::test_support::{draft_with_items, input};
use crate::workflow::{Actor, WorkflowError};
use outlay_shared::types::UserId;

#[derive(Debug, Clone)]
enum Op {
    Add(Decimal),
    Remove(Index),
}

/// Strategy for generating non-negative amounts with two decimal places.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating amounts anywhere up to the largest two-place decimal.
fn arb_large_amount() -> impl Strategy<Value = Decimal> {
    (0i128..(1i128 << 96)).prop_map(|cents| Decimal::from_i128_with_scale(cents, 2))
}

/// Strategy for generating ledger operations.
fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_amount().prop_map(Op::Add),
        1 => any::<Index>().prop_map(Op::Remove),
    ]
}

fn seqs(items: &[ExpenseLineItem]) -> Vec<u32> {
    items.iter().map(|item| item.seq).collect()
}

fn sum(items: &[ExpenseLineItem]) -> Decimal {
    items.iter().map(|item| item.amount.value()).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any add/remove sequence leaves contiguous sequence numbers and a
    /// total equal to the sum of amounts.
    #[test]
    fn prop_sequences_contiguous_and_total_consistent(
        ops in prop::collection::vec(arb_op(), 0..40)
    ) {
        let owner = UserId::new();
        let mut report = draft_with_items(owner, &[]);
        let mut ledger = report.line_item_ledger(&Actor::member(owner)).unwrap();

        for op in ops {
            match op {
                Op::Add(amount) => {
                    ledger.add_item(&input(amount)).unwrap();
                }
                Op::Remove(index) => {
                    if !ledger.items().is_empty() {
                        let id = ledger.items()[index.index(ledger.items().len())].id;
                        ledger.remove_item(id).unwrap();
                    }
                }
            }

            let expected: Vec<u32> = (1..).take(ledger.items().len()).collect();
            prop_assert_eq!(seqs(ledger.items()), expected);
            prop_assert_eq!(ledger.total().value(), sum(ledger.items()));
        }
    }

    /// Removing a non-last item and re-adding an equivalent one changes its
    /// sequence number but not the total.
    #[test]
    fn prop_remove_readd_keeps_total(
        amounts in prop::collection::vec(arb_amount(), 2..15),
        pick in any::<Index>(),
    ) {
        let owner = UserId::new();
        let mut report = draft_with_items(owner, &amounts);
        let before = report.total();
        let target = report.line_items()[pick.index(amounts.len() - 1)].clone();

        let mut ledger = report.line_item_ledger(&Actor::member(owner)).unwrap();
        ledger.remove_item(target.id).unwrap();
        let readded = ledger
            .add_item(&LineItemInput {
                date: target.date,
                category: target.category,
                description: target.description.clone(),
                amount: target.amount.value(),
            })
            .unwrap();

        prop_assert_ne!(readded.seq, target.seq);
        prop_assert_eq!(ledger.total(), before);
    }

    /// Adding amounts near the decimal bound either succeeds with a
    /// consistent total or fails validation without touching the ledger.
    #[test]
    fn prop_large_amounts_fail_cleanly(
        amounts in prop::collection::vec(arb_large_amount(), 1..8)
    ) {
        let owner = UserId::new();
        let mut report = draft_with_items(owner, &[]);
        let mut ledger = report.line_item_ledger(&Actor::member(owner)).unwrap();

        for amount in amounts {
            let before = (ledger.items().len(), ledger.total());
            match ledger.add_item(&input(amount)) {
                Ok(item) => {
                    prop_assert_eq!(item.amount.value(), amount);
                    prop_assert_eq!(item.amount.value().scale(), 2);
                    prop_assert_eq!(ledger.total().value(), sum(ledger.items()));
                }
                Err(err) => {
                    prop_assert!(matches!(err, WorkflowError::Validation(_)));
                    prop_assert_eq!((ledger.items().len(), ledger.total()), before);
                }
            }
        }
    }
}
