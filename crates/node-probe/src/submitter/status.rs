// SPDX-License-Identifier: GPL-3.0

use crate::error::SubmissionError;
use std::fmt;
use subxt::{
	OnlineClient, SubstrateConfig,
	config::substrate::H256,
	tx::{TxProgress, TxStatus},
};

/// Hash of a submitted extrinsic.
pub type ExtrinsicHash = H256;

/// Lifecycle of a submitted extrinsic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtrinsicStatus {
	/// Accepted into the transaction pool.
	Submitted,
	/// Included in the best block with the given hash.
	InBlock(H256),
	/// Included in the finalized block with the given hash.
	Finalized(H256),
	/// Removed from the pool without being included.
	Dropped(String),
	/// Rejected as invalid.
	Invalid(String),
}

impl ExtrinsicStatus {
	fn rank(&self) -> u8 {
		match self {
			ExtrinsicStatus::Submitted => 0,
			ExtrinsicStatus::InBlock(_) => 1,
			ExtrinsicStatus::Finalized(_) | ExtrinsicStatus::Dropped(_) | ExtrinsicStatus::Invalid(_) =>
				2,
		}
	}

	/// Whether no further status can follow.
	pub fn is_terminal(&self) -> bool {
		self.rank() == 2
	}
}

/// Map a subxt transaction status onto the extrinsic lifecycle.
pub(crate) fn extrinsic_status<C>(status: TxStatus<SubstrateConfig, C>) -> ExtrinsicStatus {
	match status {
		TxStatus::InBestBlock(block) => ExtrinsicStatus::InBlock(block.block_hash()),
		TxStatus::InFinalizedBlock(block) => ExtrinsicStatus::Finalized(block.block_hash()),
		TxStatus::Error { message } | TxStatus::Invalid { message } =>
			ExtrinsicStatus::Invalid(message),
		TxStatus::Dropped { message } => ExtrinsicStatus::Dropped(message),
		// Validated, broadcast, or retracted from the best block.
		TxStatus::Validated | TxStatus::Broadcasted | TxStatus::NoLongerInBestBlock =>
			ExtrinsicStatus::Submitted,
	}
}

/// Enforces that statuses only move forward.
///
/// `Submitted < InBlock < {Finalized, Dropped, Invalid}`. A new best block while in a block is
/// accepted; anything after a terminal status is not.
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
	current: Option<ExtrinsicStatus>,
}

impl StatusTracker {
	/// The last accepted status.
	pub fn current(&self) -> Option<&ExtrinsicStatus> {
		self.current.as_ref()
	}

	/// Whether a terminal status was accepted.
	pub fn is_terminal(&self) -> bool {
		self.current.as_ref().is_some_and(ExtrinsicStatus::is_terminal)
	}

	/// Record `next` if it moves the lifecycle forward, returning it back when accepted.
	pub fn advance(&mut self, next: ExtrinsicStatus) -> Option<ExtrinsicStatus> {
		if let Some(current) = &self.current {
			let forward = match (current, &next) {
				(current, _) if current.is_terminal() => false,
				(ExtrinsicStatus::InBlock(a), ExtrinsicStatus::InBlock(b)) => a != b,
				(current, next) => next.rank() > current.rank(),
			};
			if !forward {
				log::warn!("Ignoring extrinsic status {next:?} after {current:?}");
				return None;
			}
		}
		self.current = Some(next.clone());
		Some(next)
	}
}

/// Status transitions of a watched extrinsic.
///
/// The stream ends after the first terminal status.
pub struct StatusStream {
	hash: ExtrinsicHash,
	progress: Option<TxProgress<SubstrateConfig, OnlineClient<SubstrateConfig>>>,
	tracker: StatusTracker,
}

impl StatusStream {
	pub(crate) fn new(progress: TxProgress<SubstrateConfig, OnlineClient<SubstrateConfig>>) -> Self {
		Self {
			hash: progress.extrinsic_hash(),
			progress: Some(progress),
			tracker: StatusTracker::default(),
		}
	}

	/// Hash of the watched extrinsic.
	pub fn extrinsic_hash(&self) -> ExtrinsicHash {
		self.hash
	}

	/// The next status transition, or `None` once the stream has ended.
	pub async fn next(&mut self) -> Option<Result<ExtrinsicStatus, SubmissionError>> {
		loop {
			let progress = self.progress.as_mut()?;
			let status = match progress.next().await {
				Some(Ok(status)) => extrinsic_status(status),
				Some(Err(e)) => {
					self.progress = None;
					return Some(Err(SubmissionError::Rejected(e.to_string())));
				},
				None => {
					self.progress = None;
					return None;
				},
			};
			if let Some(status) = self.tracker.advance(status) {
				log::debug!("Extrinsic {:?}: {status:?}", self.hash);
				if status.is_terminal() {
					self.progress = None;
				}
				return Some(Ok(status));
			}
		}
	}

	/// Consume the stream until the extrinsic is finalized, returning the finalized block hash.
	pub async fn wait_for_finalized(mut self) -> Result<H256, SubmissionError> {
		while let Some(status) = self.next().await {
			match status? {
				ExtrinsicStatus::Finalized(block) => return Ok(block),
				ExtrinsicStatus::Dropped(message) | ExtrinsicStatus::Invalid(message) =>
					return Err(SubmissionError::NotFinalized(message)),
				_ => {},
			}
		}
		Err(SubmissionError::NotFinalized("status stream ended".to_string()))
	}
}

impl fmt::Debug for StatusStream {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StatusStream")
			.field("hash", &self.hash)
			.field("current", &self.tracker.current())
			.field("ended", &self.progress.is_none())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use ExtrinsicStatus::*;

	fn track(statuses: Vec<ExtrinsicStatus>) -> Vec<ExtrinsicStatus> {
		let mut tracker = StatusTracker::default();
		statuses.into_iter().filter_map(|status| tracker.advance(status)).collect()
	}

	#[test]
	fn forward_transitions_are_accepted() {
		let a = H256::repeat_byte(0xaa);
		assert_eq!(
			track(vec![Submitted, InBlock(a), Finalized(a)]),
			vec![Submitted, InBlock(a), Finalized(a)]
		);
	}

	#[test]
	fn backward_transitions_are_dropped() {
		let a = H256::repeat_byte(0xaa);
		assert_eq!(track(vec![Submitted, InBlock(a), Submitted, Finalized(a)]), vec![
			Submitted,
			InBlock(a),
			Finalized(a)
		]);
	}

	#[test]
	fn nothing_follows_a_terminal_status() {
		let a = H256::repeat_byte(0xaa);
		let b = H256::repeat_byte(0xbb);
		assert_eq!(track(vec![InBlock(a), Finalized(a), InBlock(b)]), vec![InBlock(a), Finalized(a)]);
		assert_eq!(
			track(vec![Submitted, Invalid("bad".into()), Finalized(a)]),
			vec![Submitted, Invalid("bad".into())]
		);
	}

	#[test]
	fn new_best_block_is_accepted_once() {
		let a = H256::repeat_byte(0xaa);
		let b = H256::repeat_byte(0xbb);
		assert_eq!(track(vec![InBlock(a), InBlock(a), InBlock(b)]), vec![InBlock(a), InBlock(b)]);
	}

	#[test]
	fn pool_statuses_map_onto_lifecycle() {
		type Status = TxStatus<SubstrateConfig, ()>;
		assert_eq!(extrinsic_status(Status::Validated), Submitted);
		assert_eq!(extrinsic_status(Status::Broadcasted), Submitted);
		assert_eq!(extrinsic_status(Status::NoLongerInBestBlock), Submitted);
		assert_eq!(
			extrinsic_status(Status::Invalid { message: "bad nonce".into() }),
			Invalid("bad nonce".into())
		);
		assert_eq!(
			extrinsic_status(Status::Error { message: "pool error".into() }),
			Invalid("pool error".into())
		);
		assert_eq!(
			extrinsic_status(Status::Dropped { message: "pool full".into() }),
			Dropped("pool full".into())
		);
		assert!(extrinsic_status(Status::Dropped { message: String::new() }).is_terminal());
	}

	#[test]
	fn dropped_is_terminal_from_any_state() {
		let mut tracker = StatusTracker::default();
		assert!(tracker.advance(Submitted).is_some());
		assert!(!tracker.is_terminal());
		assert!(tracker.advance(Dropped("pool full".into())).is_some());
		assert!(tracker.is_terminal());
		assert_eq!(tracker.current(), Some(&Dropped("pool full".into())));
	}
}
