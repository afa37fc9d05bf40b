// SPDX-License-Identifier: GPL-3.0

//! Conformance harness for the JSON-RPC surface of Polkadot SDK nodes.
//!
//! The crate connects to a live node over WebSocket, exposes the node's RPC methods through a
//! typed facade, submits signed extrinsics, and sequences conformance cases against a single
//! shared connection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Runner                               │
//! │     (connection retry, sequential cases, teardown, report)      │
//! └─────────────────────────────────────────────────────────────────┘
//!                │                                   │
//!                ▼                                   ▼
//! ┌───────────────────────────────┐  ┌──────────────────────────────┐
//! │        ChainApi (facade)      │  │     ExtrinsicSubmitter       │
//! │ chain_* state_* system_* ...  │  │ transfer, sudo, set_code     │
//! └───────────────────────────────┘  └──────────────────────────────┘
//!                │          borrows          │
//!                ▼                           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Connection (WebSocket)                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod api;
mod config;
mod connection;
pub mod error;
mod runner;
mod signer;
pub mod storage;
mod strings;
mod submitter;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod types;

pub use api::{ChainApi, HeadSubscription};
pub use config::HarnessConfig;
pub use connection::{Connection, ConnectionState};
pub use error::{ConnectionError, HarnessError, RpcError, SubmissionError};
pub use runner::{
	CaseFuture, CaseReport, HarnessContext, Outcome, Report, Runner, RunnerState, Skip, TestCase,
};
pub use signer::{create_signer, parse_account};
pub use storage::{AccountData, AccountInfo};
pub use submitter::{
	CallCandidates, CallName, CallPath, CallTable, ExtrinsicHash, ExtrinsicStatus,
	ExtrinsicSubmitter, StatusStream, StatusTracker, calls,
};
pub use types::{
	Block, Bytes, ChainHeader, ChainType, Digest, DigestItem, FinalityProof, HeaderExt,
	RuntimeMetadata, RuntimeVersion, RuntimeVersionExt, SignedBlock, StorageChangeSet,
	SystemProperties,
};

// External exports from subxt.
pub use subxt::{config::substrate::H256, dynamic::Value, tx::DynamicPayload, utils::AccountId32};
pub use subxt_signer::sr25519::Keypair;

/// Name and version of this client library, e.g. `node-probe v0.1.0`.
pub const LIBRARY_INFO: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));
