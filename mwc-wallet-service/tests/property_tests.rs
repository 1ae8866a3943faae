//! Property-based tests for the wallet backends

use mwc_core::{ListenState, Wallet};
use mwc_params::NANO_PER_MWC;
use mwc_wallet_service::{MockFixture, MockWallet};
use proptest::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Listener request: (start?, channel bits)
fn listen_op_strategy() -> impl Strategy<Value = (bool, u32)> {
    (any::<bool>(), 0u32..=3)
}

/// Small send amounts that the fixture balance always covers
fn send_amount_strategy() -> impl Strategy<Value = u64> {
    1u64..=NANO_PER_MWC / 10
}

fn keybase_fixture() -> MockFixture {
    MockFixture {
        keybase_available: true,
        ..MockFixture::default()
    }
}

// ============================================================================
// Listener Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: listener state equals the union of starts minus later stops
    #[test]
    fn prop_listen_state_tracks_requests(
        ops in prop::collection::vec(listen_op_strategy(), 0..40)
    ) {
        let dir = TempDir::new().unwrap();
        let mut wallet = MockWallet::with_fixture(dir.path(), keybase_fixture()).unwrap();
        let mut bits = 0u32;

        for (start, request) in ops {
            let requested = ListenState::from_bits(request);
            if start {
                wallet.start_listening(requested).unwrap();
                bits |= request;
            } else {
                wallet.stop_listening(requested).unwrap();
                bits &= !request;
            }
            prop_assert_eq!(wallet.listening_status().bits(), bits);
        }
    }

    /// Property: a failed keybase start never changes the listener state
    #[test]
    fn prop_unavailable_keybase_is_atomic(
        ops in prop::collection::vec(listen_op_strategy(), 0..20)
    ) {
        let dir = TempDir::new().unwrap();
        let mut wallet = MockWallet::new(dir.path()).unwrap();

        for (start, request) in ops {
            let before = wallet.listening_status();
            let requested = ListenState::from_bits(request);
            if start {
                let result = wallet.start_listening(requested);
                if requested.keybase {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(wallet.listening_status(), before);
                }
            } else {
                wallet.stop_listening(requested).unwrap();
            }
            prop_assert!(!wallet.listening_status().keybase);
        }
    }
}

// ============================================================================
// Transaction Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: every send gets a fresh index above all earlier ones, and the
    /// history survives a restart unchanged
    #[test]
    fn prop_send_indices_increase(
        amounts in prop::collection::vec(send_amount_strategy(), 1..10)
    ) {
        let dir = TempDir::new().unwrap();
        let history = {
            let mut wallet = MockWallet::new(dir.path()).unwrap();
            let mut last = wallet.transactions(1)[0].idx;
            for amount in &amounts {
                wallet.send_to(*amount, "xd7peer", "", 10, 1).unwrap();
                let newest = wallet.transactions(1)[0].clone();
                prop_assert!(newest.idx > last);
                prop_assert_eq!(newest.amount, *amount);
                last = newest.idx;
            }
            wallet.transactions(0)
        };

        let reopened = MockWallet::new(dir.path()).unwrap();
        prop_assert_eq!(reopened.transactions(0), history);
    }
}

#[test]
fn test_mock_issues_fixture_phrase() {
    let dir = TempDir::new().unwrap();
    let mut wallet = MockWallet::new(dir.path()).unwrap();
    assert_eq!(wallet.init().unwrap(), MockFixture::default().seed_words);
    assert_eq!(wallet.init().unwrap().len(), 24);
}
