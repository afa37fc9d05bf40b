// SPDX-License-Identifier: GPL-3.0

//! Keys and value types of well-known FRAME storage entries.
//!
//! A plain value lives at `twox128(pallet) ++ twox128(item)`. Map entries append the hashed map
//! key; `System::Account` uses `Blake2_128Concat`, i.e. `blake2_128(account) ++ account`.

use crate::strings::storage::{items, pallets};
use scale::{Decode, Encode};
use sp_core::{blake2_128, twox_128};
use subxt::utils::AccountId32;

/// Key of the plain storage value `pallet::item`.
pub fn value_key(pallet: &str, item: &str) -> Vec<u8> {
	[twox_128(pallet.as_bytes()), twox_128(item.as_bytes())].concat()
}

/// `Timestamp::Now`: milliseconds since the Unix epoch, set by the block's timestamp inherent.
pub fn timestamp_now_key() -> Vec<u8> {
	value_key(pallets::TIMESTAMP, items::NOW)
}

/// `Balances::TotalIssuance`.
pub fn total_issuance_key() -> Vec<u8> {
	value_key(pallets::BALANCES, items::TOTAL_ISSUANCE)
}

/// `Babe::CurrentSlot`.
pub fn current_slot_key() -> Vec<u8> {
	value_key(pallets::BABE, items::CURRENT_SLOT)
}

/// `System::Account(account)`.
pub fn system_account_key(account: &AccountId32) -> Vec<u8> {
	let mut key = value_key(pallets::SYSTEM, items::ACCOUNT);
	key.extend_from_slice(&blake2_128(&account.0));
	key.extend_from_slice(&account.0);
	key
}

/// `frame_system::AccountInfo` with `pallet_balances::AccountData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct AccountInfo {
	/// Number of transactions sent by the account.
	pub nonce: u32,
	pub consumers: u32,
	pub providers: u32,
	pub sufficients: u32,
	/// Balances of the account.
	pub data: AccountData,
}

/// Balances held by an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct AccountData {
	/// Balance that can be transferred or reserved.
	pub free: u128,
	pub reserved: u128,
	pub frozen: u128,
	pub flags: u128,
}

#[cfg(test)]
mod tests {
	use super::*;

	// //Alice
	const ALICE: [u8; 32] = [
		0xd4, 0x35, 0x93, 0xc7, 0x15, 0xfd, 0xd3, 0x1c, 0x61, 0x14, 0x1a, 0xbd, 0x04, 0xa9, 0x9f, 0xd6,
		0x82, 0x2c, 0x85, 0x58, 0x85, 0x4c, 0xcd, 0xe3, 0x9a, 0x56, 0x84, 0xe7, 0xa5, 0x6d, 0xa2, 0x7d,
	];

	#[test]
	fn well_known_value_keys() {
		assert_eq!(
			hex::encode(timestamp_now_key()),
			"f0c365c3cf59d671eb72da0e7a4113c49f1f0515f462cdcf84e0f1d6045dfcbb"
		);
		assert_eq!(
			hex::encode(total_issuance_key()),
			"c2261276cc9d1f8598ea4b6a74b15c2f57c875e4cff74148e4628f264b974c80"
		);
		assert_eq!(
			hex::encode(current_slot_key()),
			"1cb6f36e027abb2091cfb5110ab5087f06155b3cd9a8c9e5e9a23fd5dc13a5ed"
		);
	}

	#[test]
	fn system_account_key_ends_with_the_account() {
		let key = system_account_key(&AccountId32(ALICE));
		assert_eq!(
			hex::encode(&key[..32]),
			"26aa394eea5630e07c48ae0c9558cef7b99d880ec681799c0cf30e8886371da9"
		);
		assert_eq!(key.len(), 32 + 16 + 32);
		assert_eq!(key[32..48], blake2_128(&ALICE));
		assert_eq!(key[48..], ALICE);
	}

	#[test]
	fn account_info_layout() {
		let info = AccountInfo {
			nonce: 7,
			providers: 1,
			data: AccountData { free: 1_000, ..Default::default() },
			..Default::default()
		};
		let encoded = info.encode();
		// Four u32 counters, then four u128 balances.
		assert_eq!(encoded.len(), 4 * 4 + 4 * 16);
		assert_eq!(encoded[..4], 7u32.to_le_bytes());
		assert_eq!(encoded[16..32], 1_000u128.to_le_bytes());
		assert_eq!(AccountInfo::decode(&mut &encoded[..]).unwrap(), info);
	}
}
