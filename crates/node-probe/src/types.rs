// SPDX-License-Identifier: GPL-3.0

//! Response types of the node RPC methods.
//!
//! Hash-valued fields are [`H256`], so a hash that is not exactly 32 bytes fails to decode.

use serde::{Deserialize, Serialize};
use std::fmt;
use subxt::{
	backend::legacy::rpc_methods,
	config::{
		Header,
		substrate::{BlakeTwo256, H256, SubstrateHeader},
	},
};

pub use rpc_methods::{Bytes, RuntimeVersion, SystemProperties};
pub use subxt::config::substrate::{Digest, DigestItem};

/// A block header as returned by `chain_getHeader` and the new-heads subscription.
pub type ChainHeader = SubstrateHeader<u32, BlakeTwo256>;

/// Block hash of a header.
pub trait HeaderExt {
	/// Blake2-256 of the SCALE-encoded header.
	fn hash(&self) -> H256;
}

impl HeaderExt for ChainHeader {
	fn hash(&self) -> H256 {
		self.hash_with(BlakeTwo256)
	}
}

/// Storage values for a set of keys at one block.
pub type StorageChangeSet = rpc_methods::StorageChangeSet<H256>;

/// Block body and header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
	/// The block header.
	pub header: ChainHeader,
	/// Encoded extrinsics included in the block.
	pub extrinsics: Vec<Bytes>,
}

/// A block together with its justifications, as returned by `chain_getBlock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBlock {
	/// The block.
	pub block: Block,
	/// Finality justifications, if the node has any for this block.
	#[serde(default)]
	pub justifications: Option<serde_json::Value>,
}

/// Typed access to the [`RuntimeVersion`] fields subxt keeps as raw JSON.
pub trait RuntimeVersionExt {
	/// Spec name (e.g., "westend").
	fn spec_name(&self) -> Option<&str>;

	/// Supported runtime APIs: (hex-encoded API id, version), in runtime order.
	fn apis(&self) -> Vec<(&str, u32)>;

	/// Version of the runtime API with the given hex-encoded id, if the runtime implements it.
	fn api_version(&self, id: &str) -> Option<u32> {
		self.apis().into_iter().find(|(api, _)| api.eq_ignore_ascii_case(id)).map(|(_, v)| v)
	}
}

impl RuntimeVersionExt for RuntimeVersion {
	fn spec_name(&self) -> Option<&str> {
		self.other.get("specName")?.as_str()
	}

	fn apis(&self) -> Vec<(&str, u32)> {
		let Some(apis) = self.other.get("apis").and_then(serde_json::Value::as_array) else {
			return Vec::new();
		};
		apis.iter()
			.filter_map(|api| match api.as_array()?.as_slice() {
				[id, version] => Some((id.as_str()?, u32::try_from(version.as_u64()?).ok()?)),
				_ => None,
			})
			.collect()
	}
}

/// Raw runtime metadata as returned by `state_getMetadata`.
#[derive(Clone, PartialEq, Eq)]
pub struct RuntimeMetadata(pub Vec<u8>);

impl RuntimeMetadata {
	/// The metadata magic number: `b"meta"` read as a little-endian `u32`.
	pub const MAGIC_NUMBER: u32 = 0x6174_656d;

	/// The magic number prefixing the metadata, if there are at least four bytes.
	pub fn magic_number(&self) -> Option<u32> {
		let prefix: [u8; 4] = self.0.get(..4)?.try_into().ok()?;
		Some(u32::from_le_bytes(prefix))
	}

	/// The metadata format version that follows the magic number.
	pub fn version(&self) -> Option<u8> {
		self.0.get(4).copied()
	}

	/// Whether the bytes start with the expected magic number.
	pub fn is_valid(&self) -> bool {
		self.magic_number() == Some(Self::MAGIC_NUMBER)
	}

	/// Size of the encoded metadata in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the node returned empty metadata.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for RuntimeMetadata {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RuntimeMetadata")
			.field("magic_number", &self.magic_number())
			.field("version", &self.version())
			.field("len", &self.0.len())
			.finish()
	}
}

/// The type of chain, as reported by `system_chainType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainType {
	/// A development chain that runs mainly on one node.
	Development,
	/// A local chain that runs locally on multiple nodes for testing purposes.
	Local,
	/// A live chain.
	Live,
	/// Some custom chain type.
	Custom(String),
}

/// An encoded finality proof, as returned by `grandpa_proveFinality`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinalityProof(pub Bytes);

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use subxt::config::Hasher;

	fn header_json() -> serde_json::Value {
		json!({
			"parentHash": format!("0x{}", "11".repeat(32)),
			"number": "0x1a",
			"stateRoot": format!("0x{}", "22".repeat(32)),
			"extrinsicsRoot": format!("0x{}", "33".repeat(32)),
			// PreRuntime(*b"BABE", vec![0xff])
			"digest": { "logs": ["0x064241424504ff"] }
		})
	}

	#[test]
	fn header_decodes_from_node_json() {
		let header: ChainHeader = serde_json::from_value(header_json()).unwrap();
		assert_eq!(header.number, 26);
		assert_eq!(header.parent_hash, H256::repeat_byte(0x11));
		assert_eq!(header.state_root.as_bytes().len(), 32);
		assert_eq!(header.digest.logs, vec![DigestItem::PreRuntime(*b"BABE", vec![0xff])]);
	}

	#[test]
	fn header_round_trips_number_as_hex() {
		let header: ChainHeader = serde_json::from_value(header_json()).unwrap();
		let value = serde_json::to_value(&header).unwrap();
		assert_eq!(value["number"], "0x1a");
	}

	#[test]
	fn header_accepts_integer_number() {
		let mut value = header_json();
		value["number"] = json!(7);
		let header: ChainHeader = serde_json::from_value(value).unwrap();
		assert_eq!(header.number, 7);
	}

	#[test]
	fn short_hash_is_rejected() {
		let mut value = header_json();
		value["stateRoot"] = json!("0x1234");
		assert!(serde_json::from_value::<ChainHeader>(value).is_err());
	}

	#[test]
	fn header_hash_is_blake2_of_scale_encoding() {
		let header: ChainHeader = serde_json::from_value(header_json()).unwrap();
		let hash = header.hash();
		assert_eq!(hash, H256::from(sp_core::blake2_256(&scale::Encode::encode(&header))));
		assert_eq!(hash, BlakeTwo256.hash_of(&header));

		let mut other = header.clone();
		other.number += 1;
		assert_ne!(hash, other.hash());
	}

	#[test]
	fn runtime_version_exposes_name_and_apis_in_order() {
		let version: RuntimeVersion = serde_json::from_value(json!({
			"specName": "westend",
			"implName": "parity-westend",
			"authoringVersion": 2,
			"specVersion": 9430,
			"implVersion": 0,
			"apis": [["0xdf6acb689907609b", 4], ["0x37e397fc7c91f5e4", 2]],
			"transactionVersion": 22,
			"stateVersion": 1
		}))
		.unwrap();
		assert_eq!(version.spec_version, 9430);
		assert_eq!(version.spec_name(), Some("westend"));
		assert_eq!(version.apis(), vec![("0xdf6acb689907609b", 4), ("0x37e397fc7c91f5e4", 2)]);
		assert_eq!(version.api_version("0x37E397FC7C91F5E4"), Some(2));
		assert_eq!(version.api_version("0x0000000000000000"), None);
	}

	#[test]
	fn runtime_version_without_apis() {
		let version: RuntimeVersion =
			serde_json::from_value(json!({ "specVersion": 1, "transactionVersion": 1 })).unwrap();
		assert_eq!(version.spec_name(), None);
		assert!(version.apis().is_empty());
	}

	#[test]
	fn metadata_magic_number() {
		let metadata = RuntimeMetadata(b"meta\x0e\x00".to_vec());
		assert_eq!(metadata.magic_number(), Some(RuntimeMetadata::MAGIC_NUMBER));
		assert_eq!(metadata.version(), Some(14));
		assert!(metadata.is_valid());
		assert!(!RuntimeMetadata(b"met".to_vec()).is_valid());
	}

	#[test]
	fn chain_type_decodes_unit_and_custom() {
		assert_eq!(serde_json::from_value::<ChainType>(json!("Local")).unwrap(), ChainType::Local);
		assert_eq!(
			serde_json::from_value::<ChainType>(json!({ "Custom": "staging" })).unwrap(),
			ChainType::Custom("staging".into())
		);
	}

	#[test]
	fn storage_change_set_decodes_missing_values() {
		let set: StorageChangeSet = serde_json::from_value(json!({
			"block": format!("0x{}", "ab".repeat(32)),
			"changes": [["0x01", "0x0203"], ["0x04", null]]
		}))
		.unwrap();
		assert_eq!(set.block, H256::repeat_byte(0xab));
		assert_eq!(set.changes[0], (Bytes(vec![1]), Some(Bytes(vec![2, 3]))));
		assert_eq!(set.changes[1], (Bytes(vec![4]), None));
	}
}
