// SPDX-License-Identifier: GPL-3.0

//! In-memory chain backing the mock node.

use crate::{
	storage::{
		AccountData, AccountInfo, current_slot_key, system_account_key, timestamp_now_key,
		total_issuance_key,
	},
	types::{Block, ChainHeader, Digest, HeaderExt, SignedBlock},
};
use scale::Encode;
use subxt::{config::substrate::H256, utils::AccountId32};

/// The `//Alice` development account, endowed at genesis.
pub(crate) const ALICE: AccountId32 = AccountId32([
	0xd4, 0x35, 0x93, 0xc7, 0x15, 0xfd, 0xd3, 0x1c, 0x61, 0x14, 0x1a, 0xbd, 0x04, 0xa9, 0x9f, 0xd6,
	0x82, 0x2c, 0x85, 0x58, 0x85, 0x4c, 0xcd, 0xe3, 0x9a, 0x56, 0x84, 0xe7, 0xa5, 0x6d, 0xa2, 0x7d,
]);

/// Free balance of [`ALICE`].
pub(crate) const ALICE_FREE: u128 = 1_000_000_000_000_000_000;

/// `Timestamp::Now` served at every block.
pub(crate) const NOW: u64 = 1_700_000_000_000;

/// Blocks and storage of the mock chain. Storage never changes between blocks.
#[derive(Debug)]
pub(crate) struct MockChain {
	blocks: Vec<ChainHeader>,
	storage: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MockChain {
	/// A chain holding genesis plus `initial_blocks` blocks on top of it.
	pub(crate) fn new(initial_blocks: u32) -> Self {
		let genesis = ChainHeader {
			parent_hash: H256::zero(),
			number: 0,
			state_root: H256::repeat_byte(0x01),
			extrinsics_root: H256::repeat_byte(0x02),
			digest: Digest::default(),
		};
		let alice = AccountInfo {
			providers: 1,
			data: AccountData { free: ALICE_FREE, ..Default::default() },
			..Default::default()
		};
		let storage = vec![
			(current_slot_key(), 284_000_000u64.encode()),
			(total_issuance_key(), ALICE_FREE.encode()),
			(timestamp_now_key(), NOW.encode()),
			(system_account_key(&ALICE), alice.encode()),
		];
		let mut chain = Self { blocks: vec![genesis], storage };
		for _ in 0..initial_blocks {
			chain.produce_block();
		}
		chain
	}

	/// Append a block on top of the best block and return its header.
	pub(crate) fn produce_block(&mut self) -> ChainHeader {
		let parent = self.best();
		let number = parent.number + 1;
		let header = ChainHeader {
			parent_hash: parent.hash(),
			number,
			state_root: parent.state_root,
			extrinsics_root: H256::from(sp_core::blake2_256(&number.encode())),
			digest: Digest::default(),
		};
		self.blocks.push(header.clone());
		header
	}

	pub(crate) fn best(&self) -> &ChainHeader {
		// The chain always holds genesis.
		&self.blocks[self.blocks.len() - 1]
	}

	pub(crate) fn header_at(&self, number: u32) -> Option<&ChainHeader> {
		self.blocks.get(number as usize)
	}

	pub(crate) fn header(&self, hash: H256) -> Option<&ChainHeader> {
		self.blocks.iter().find(|header| header.hash() == hash)
	}

	/// Resolve an optional hash to a header, defaulting to the best block.
	pub(crate) fn header_or_best(&self, hash: Option<H256>) -> Option<&ChainHeader> {
		match hash {
			Some(hash) => self.header(hash),
			None => Some(self.best()),
		}
	}

	pub(crate) fn block(&self, header: &ChainHeader) -> SignedBlock {
		// A single timestamp-like extrinsic per block.
		let extrinsic = (header.number as u64 * 6_000).encode();
		SignedBlock {
			block: Block { header: header.clone(), extrinsics: vec![extrinsic.into()] },
			justifications: None,
		}
	}

	pub(crate) fn storage(&self, key: &[u8]) -> Option<Vec<u8>> {
		self.storage.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
	}

	pub(crate) fn storage_entries(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
		self.storage.clone()
	}
}
