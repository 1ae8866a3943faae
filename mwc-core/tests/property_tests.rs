//! Property-based tests for mwc-core
//!
//! Uses proptest to verify the wallet state invariants across randomized inputs

use mwc_core::{
    format_amount, parse_amount, Error, TxDirection, WalletContact, WalletState,
    WalletTransaction,
};
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate account / contact names
fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap()
}

/// Generate a batch of names, duplicates allowed
fn names_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(name_strategy(), 0..30)
}

/// Generate nano-MWC amounts
fn amount_strategy() -> impl Strategy<Value = u64> {
    1u64..=(20_000_000 * 1_000_000_000)
}

// ============================================================================
// Account Properties
// ============================================================================

proptest! {
    /// Property: account list grows by exactly the successful creations
    #[test]
    fn prop_account_count_matches_successes(names in names_strategy()) {
        let mut state = WalletState::new();
        let preloaded = state.account_names().len();
        let mut successes = 0;
        for name in &names {
            if state.create_account(name).is_ok() {
                successes += 1;
            }
        }

        prop_assert_eq!(state.account_names().len(), preloaded + successes);
        let unique: HashSet<&String> = state.account_names().iter().collect();
        prop_assert_eq!(unique.len(), state.account_names().len());
    }

    /// Property: exactly one account is selected after any switch sequence
    #[test]
    fn prop_single_selection(names in names_strategy(), picks in prop::collection::vec(name_strategy(), 0..10)) {
        let mut state = WalletState::new();
        for name in &names {
            let _ = state.create_account(name);
        }
        for pick in &picks {
            let before = state.selected_index();
            if state.switch_account(pick).is_err() {
                prop_assert_eq!(state.selected_index(), before);
            }
        }
        let selected = state.accounts().iter().filter(|a| a.selected).count();
        prop_assert_eq!(selected, 1);
    }
}

// ============================================================================
// Contact Properties
// ============================================================================

proptest! {
    /// Property: one entry per name, holding the last address written
    #[test]
    fn prop_contact_upsert_keeps_names_unique(
        entries in prop::collection::vec((name_strategy(), "[a-z0-9]{1,20}"), 0..30)
    ) {
        let mut state = WalletState::new();
        for (name, address) in &entries {
            let existed = state.contacts().iter().any(|c| &c.name == name);
            let result = state.upsert_contact(WalletContact::new(name.clone(), address.clone()));
            if existed {
                prop_assert!(matches!(result, Err(Error::ContactExists(_))));
            } else {
                prop_assert!(result.is_ok());
            }
        }

        let names: HashSet<&String> = state.contacts().iter().map(|c| &c.name).collect();
        prop_assert_eq!(names.len(), state.contacts().len());

        for contact in state.contacts() {
            let last = entries.iter().rev().find(|(n, _)| n == &contact.name).unwrap();
            prop_assert_eq!(&contact.address, &last.1);
        }
    }
}

// ============================================================================
// Transaction Properties
// ============================================================================

proptest! {
    /// Property: each appended transaction gets max(existing) + 1
    #[test]
    fn prop_transaction_indices_increase(amounts in prop::collection::vec(amount_strategy(), 1..20)) {
        let mut state = WalletState::new();
        let mut last = None;
        for amount in amounts {
            let expected = state.next_transaction_index().unwrap();
            let idx = state.push_transaction(WalletTransaction::pending(
                TxDirection::Send, "slate", "addr", amount, None,
            )).unwrap();
            prop_assert_eq!(idx, expected);
            if let Some(prev) = last {
                prop_assert_eq!(idx, prev + 1);
            }
            last = Some(idx);
        }
    }

    /// Property: formatting then parsing an amount is lossless
    #[test]
    fn prop_amount_text_is_lossless(amount in amount_strategy()) {
        prop_assert_eq!(parse_amount(&format_amount(amount)).unwrap(), amount);
    }
}
