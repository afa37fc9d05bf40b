// SPDX-License-Identifier: GPL-3.0

//! JSON-RPC methods served by the mock node.

use super::{MockNodeConfig, chain::MockChain};
use crate::types::{
	Bytes, ChainHeader, ChainType, FinalityProof, HeaderExt, RuntimeVersion, SignedBlock,
	StorageChangeSet, SystemProperties,
};
use jsonrpsee::{
	PendingSubscriptionSink, SubscriptionMessage,
	core::{RpcResult, SubscriptionResult},
	proc_macros::rpc,
	types::ErrorObjectOwned,
};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};
use subxt::config::substrate::H256;
use tokio::sync::broadcast;

const INVALID_PARAMS: i32 = -32602;

/// The subset of node RPC methods the harness exercises.
#[rpc(server)]
pub trait NodeRpc {
	#[method(name = "chain_getBlockHash")]
	async fn block_hash(&self, number: Option<u32>) -> RpcResult<Option<H256>>;

	#[method(name = "chain_getHeader")]
	async fn header(&self, hash: Option<H256>) -> RpcResult<Option<ChainHeader>>;

	#[method(name = "chain_getBlock")]
	async fn block(&self, hash: Option<H256>) -> RpcResult<Option<SignedBlock>>;

	#[method(name = "chain_getFinalizedHead")]
	async fn finalized_head(&self) -> RpcResult<H256>;

	#[subscription(name = "chain_subscribeNewHeads" => "chain_newHead", unsubscribe = "chain_unsubscribeNewHeads", item = ChainHeader)]
	async fn subscribe_new_heads(&self) -> SubscriptionResult;

	#[method(name = "state_getRuntimeVersion")]
	async fn runtime_version(&self) -> RpcResult<RuntimeVersion>;

	#[method(name = "state_getMetadata")]
	async fn metadata(&self) -> RpcResult<Bytes>;

	#[method(name = "state_getStorage")]
	async fn storage(&self, key: Bytes, at: Option<H256>) -> RpcResult<Option<Bytes>>;

	#[method(name = "state_queryStorage")]
	async fn query_storage(
		&self,
		keys: Vec<Bytes>,
		from: H256,
		to: Option<H256>,
	) -> RpcResult<Vec<StorageChangeSet>>;

	#[method(name = "state_queryStorageAt")]
	async fn query_storage_at(
		&self,
		keys: Vec<Bytes>,
		at: Option<H256>,
	) -> RpcResult<Vec<StorageChangeSet>>;

	#[method(name = "system_chain")]
	async fn system_chain(&self) -> RpcResult<String>;

	#[method(name = "system_chainType")]
	async fn system_chain_type(&self) -> RpcResult<ChainType>;

	#[method(name = "system_name")]
	async fn system_name(&self) -> RpcResult<String>;

	#[method(name = "system_version")]
	async fn system_version(&self) -> RpcResult<String>;

	#[method(name = "system_properties")]
	async fn system_properties(&self) -> RpcResult<SystemProperties>;

	#[method(name = "grandpa_proveFinality")]
	async fn prove_finality(&self, number: u32) -> RpcResult<Option<FinalityProof>>;
}

/// Method implementations over the shared mock chain.
pub(crate) struct NodeRpcImpl {
	pub(crate) config: MockNodeConfig,
	pub(crate) chain: Arc<Mutex<MockChain>>,
	pub(crate) heads: broadcast::Sender<ChainHeader>,
}

impl NodeRpcImpl {
	fn chain(&self) -> MutexGuard<'_, MockChain> {
		lock(&self.chain)
	}

	async fn respond(&self) {
		if !self.config.response_delay.is_zero() {
			tokio::time::sleep(self.config.response_delay).await;
		}
	}

	fn change_set(&self, keys: &[Bytes], block: H256) -> StorageChangeSet {
		let chain = self.chain();
		let changes = keys
			.iter()
			.map(|key| (key.clone(), chain.storage(key).map(Bytes::from)))
			.collect();
		StorageChangeSet { block, changes }
	}
}

pub(crate) fn lock(chain: &Mutex<MockChain>) -> MutexGuard<'_, MockChain> {
	chain.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn unknown_block(hash: H256) -> ErrorObjectOwned {
	ErrorObjectOwned::owned(INVALID_PARAMS, format!("Unknown block {hash:?}"), None::<()>)
}

#[async_trait::async_trait]
impl NodeRpcServer for NodeRpcImpl {
	async fn block_hash(&self, number: Option<u32>) -> RpcResult<Option<H256>> {
		self.respond().await;
		let chain = self.chain();
		Ok(match number {
			Some(n) => chain.header_at(n).map(HeaderExt::hash),
			None => Some(chain.best().hash()),
		})
	}

	async fn header(&self, hash: Option<H256>) -> RpcResult<Option<ChainHeader>> {
		self.respond().await;
		Ok(self.chain().header_or_best(hash).cloned())
	}

	async fn block(&self, hash: Option<H256>) -> RpcResult<Option<SignedBlock>> {
		self.respond().await;
		let chain = self.chain();
		Ok(chain.header_or_best(hash).map(|header| chain.block(header)))
	}

	async fn finalized_head(&self) -> RpcResult<H256> {
		self.respond().await;
		Ok(self.chain().best().hash())
	}

	async fn subscribe_new_heads(&self, pending: PendingSubscriptionSink) -> SubscriptionResult {
		let sink = pending.accept().await?;
		let mut receiver = self.heads.subscribe();

		tokio::spawn(async move {
			loop {
				tokio::select! {
					_ = sink.closed() => break,
					head = receiver.recv() => match head {
						Ok(header) => {
							let Ok(message) = SubscriptionMessage::from_json(&header) else {
								break;
							};
							if sink.send(message).await.is_err() {
								break;
							}
						},
						Err(broadcast::error::RecvError::Lagged(_)) => continue,
						Err(broadcast::error::RecvError::Closed) => break,
					},
				}
			}
		});

		Ok(())
	}

	async fn runtime_version(&self) -> RpcResult<RuntimeVersion> {
		self.respond().await;
		let apis: Vec<_> = (0..self.config.api_count)
			.map(|i| json!([format!("0x{:016x}", 0xdf6a_cb68_9907_609b_u64.wrapping_add(i as u64)), 1]))
			.collect();
		Ok(RuntimeVersion {
			spec_version: 1_018_000,
			transaction_version: 27,
			other: [
				("specName", json!(self.config.spec_name)),
				("implName", json!(format!("parity-{}", self.config.spec_name))),
				("authoringVersion", json!(2)),
				("implVersion", json!(0)),
				("stateVersion", json!(1)),
				("apis", json!(apis)),
			]
			.into_iter()
			.map(|(key, value)| (key.to_string(), value))
			.collect(),
		})
	}

	async fn metadata(&self) -> RpcResult<Bytes> {
		self.respond().await;
		let mut metadata = b"meta".to_vec();
		metadata.push(14);
		metadata.extend_from_slice(&[0u8; 16]);
		Ok(metadata.into())
	}

	async fn storage(&self, key: Bytes, at: Option<H256>) -> RpcResult<Option<Bytes>> {
		self.respond().await;
		let chain = self.chain();
		if let Some(hash) = at {
			chain.header(hash).ok_or_else(|| unknown_block(hash))?;
		}
		Ok(chain.storage(&key).map(Bytes::from))
	}

	async fn query_storage(
		&self,
		keys: Vec<Bytes>,
		from: H256,
		to: Option<H256>,
	) -> RpcResult<Vec<StorageChangeSet>> {
		self.respond().await;
		{
			let chain = self.chain();
			let start = chain.header(from).ok_or_else(|| unknown_block(from))?.number;
			if let Some(to) = to {
				let end = chain.header(to).ok_or_else(|| unknown_block(to))?.number;
				if end < start {
					return Err(ErrorObjectOwned::owned(
						INVALID_PARAMS,
						"Range end precedes range start",
						None::<()>,
					));
				}
			}
		}
		// Storage is constant, so only the first block of the range reports values.
		Ok(vec![self.change_set(&keys, from)])
	}

	async fn query_storage_at(
		&self,
		keys: Vec<Bytes>,
		at: Option<H256>,
	) -> RpcResult<Vec<StorageChangeSet>> {
		self.respond().await;
		let block = {
			let chain = self.chain();
			match at {
				Some(hash) => chain.header(hash).ok_or_else(|| unknown_block(hash))?.hash(),
				None => chain.best().hash(),
			}
		};
		Ok(vec![self.change_set(&keys, block)])
	}

	async fn system_chain(&self) -> RpcResult<String> {
		self.respond().await;
		Ok(self.config.chain.clone())
	}

	async fn system_chain_type(&self) -> RpcResult<ChainType> {
		self.respond().await;
		Ok(self.config.chain_type.clone())
	}

	async fn system_name(&self) -> RpcResult<String> {
		self.respond().await;
		Ok("Mock Node".to_string())
	}

	async fn system_version(&self) -> RpcResult<String> {
		self.respond().await;
		Ok(env!("CARGO_PKG_VERSION").to_string())
	}

	async fn system_properties(&self) -> RpcResult<SystemProperties> {
		self.respond().await;
		let mut properties = SystemProperties::new();
		properties.insert("ss58Format".to_string(), json!(self.config.ss58_format));
		properties.insert("tokenDecimals".to_string(), json!(12));
		properties.insert("tokenSymbol".to_string(), json!("WND"));
		Ok(properties)
	}

	async fn prove_finality(&self, number: u32) -> RpcResult<Option<FinalityProof>> {
		self.respond().await;
		let chain = self.chain();
		let Some(header) = chain.header_at(number) else {
			return Err(ErrorObjectOwned::owned(
				INVALID_PARAMS,
				format!("Requested block #{number} is not yet finalized"),
				None::<()>,
			));
		};
		// An opaque proof committing to the requested block.
		Ok(Some(FinalityProof(Bytes(header.hash().as_bytes().to_vec()))))
	}
}
