// SPDX-License-Identifier: GPL-3.0

//! Error types for harness operations.
//!
//! This module contains all error types used throughout the `node-probe` crate,
//! organized by context:
//!
//! - [`connection::ConnectionError`] - Errors from establishing the WebSocket session.
//! - [`rpc::RpcError`] - Errors from individual RPC calls.
//! - [`submission::SubmissionError`] - Errors from building, signing and submitting extrinsics.
//! - [`harness::HarnessError`] - Errors that abort a whole run.

pub mod connection;
pub mod harness;
pub mod rpc;
pub mod submission;

pub use connection::ConnectionError;
pub use harness::HarnessError;
pub use rpc::RpcError;
pub use submission::SubmissionError;
