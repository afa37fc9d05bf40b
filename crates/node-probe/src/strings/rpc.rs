// SPDX-License-Identifier: GPL-3.0

//! String constants for the RPC facade.

/// JSON-RPC method names.
///
/// These match the method names exposed by Polkadot SDK nodes.
pub mod methods {
	pub const CHAIN_GET_BLOCK: &str = "chain_getBlock";
	pub const CHAIN_GET_BLOCK_HASH: &str = "chain_getBlockHash";
	pub const CHAIN_GET_FINALIZED_HEAD: &str = "chain_getFinalizedHead";
	pub const CHAIN_GET_HEADER: &str = "chain_getHeader";
	pub const CHAIN_SUBSCRIBE_NEW_HEADS: &str = "chain_subscribeNewHeads";
	pub const CHAIN_UNSUBSCRIBE_NEW_HEADS: &str = "chain_unsubscribeNewHeads";
	pub const CHAIN_NEW_HEAD: &str = "chain_newHead";
	pub const GRANDPA_PROVE_FINALITY: &str = "grandpa_proveFinality";
	pub const STATE_GET_METADATA: &str = "state_getMetadata";
	pub const STATE_GET_RUNTIME_VERSION: &str = "state_getRuntimeVersion";
	pub const STATE_GET_STORAGE: &str = "state_getStorage";
	pub const STATE_QUERY_STORAGE: &str = "state_queryStorage";
	pub const STATE_QUERY_STORAGE_AT: &str = "state_queryStorageAt";
	pub const SYSTEM_CHAIN: &str = "system_chain";
	pub const SYSTEM_CHAIN_TYPE: &str = "system_chainType";
	pub const SYSTEM_NAME: &str = "system_name";
	pub const SYSTEM_PROPERTIES: &str = "system_properties";
	pub const SYSTEM_VERSION: &str = "system_version";
}
