//! MWC wallet backends
//!
//! Two implementations of [`mwc_core::Wallet`]:
//! - [`MockWallet`]: offline, driven by a [`MockFixture`]
//! - [`NodeWallet`]: delegates to a node through a [`NodeClient`]
//!
//! Both persist their state with `mwc-storage` after every change that must
//! survive a crash, and once more when dropped.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod documents;
pub mod fixture;
pub mod mock;
pub mod node;
pub mod validation;

pub use documents::{ProofDocument, SlateDocument, SlateStage};
pub use fixture::{MockFixture, ProofFixture};
pub use mock::MockWallet;
pub use node::{generate_seed, validate_seed, NodeClient, NodeWallet, SEED_WORD_COUNT};
pub use validation::validate_send;
