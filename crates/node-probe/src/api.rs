// SPDX-License-Identifier: GPL-3.0

//! Typed facade over the node's JSON-RPC methods.
//!
//! [`ChainApi`] borrows a [`Connection`] and never closes it. Every method maps a jsonrpsee
//! failure into [`RpcError`]: error frames from the node become [`RpcError::Node`], an elapsed
//! deadline becomes [`RpcError::Timeout`], and a `null` where a value is required becomes
//! [`RpcError::InvalidResponse`]. No call is retried.

use crate::{
	Connection,
	error::RpcError,
	storage::{self, AccountInfo},
	strings::rpc::methods,
	types::{
		Bytes, ChainHeader, ChainType, FinalityProof, RuntimeMetadata, RuntimeVersion,
		SignedBlock, StorageChangeSet, SystemProperties,
	},
};
use jsonrpsee::{
	core::{
		client::{ClientT, Subscription, SubscriptionClientT},
		params::ArrayParams,
	},
	rpc_params,
};
use scale::Decode;
use serde::de::DeserializeOwned;
use subxt::{config::substrate::H256, utils::AccountId32};

/// RPC methods of a node, over a borrowed [`Connection`].
///
/// # Example
///
/// ```ignore
/// use node_probe::Connection;
///
/// let connection = Connection::connect(&"ws://127.0.0.1:8546".parse()?).await?;
/// let api = connection.api();
/// let genesis = api.genesis_hash().await?;
/// let header = api.header(None).await?;
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ChainApi<'a> {
	connection: &'a Connection,
}

impl<'a> ChainApi<'a> {
	/// Create the facade over an open connection.
	pub fn new(connection: &'a Connection) -> Self {
		Self { connection }
	}

	/// The connection this facade sends requests over.
	pub fn connection(&self) -> &'a Connection {
		self.connection
	}

	async fn request<R: DeserializeOwned>(
		&self,
		method: &'static str,
		params: ArrayParams,
	) -> Result<R, RpcError> {
		let client = self.connection.client()?;
		log::debug!("RPC request `{method}`");
		client.request(method, params).await.map_err(|e| {
			let error = RpcError::from_client(method, e);
			log::debug!("RPC request `{method}` failed: {error}");
			error
		})
	}

	/// Hash of the genesis block.
	pub async fn genesis_hash(&self) -> Result<H256, RpcError> {
		self.block_hash(Some(0)).await
	}

	/// Hash of the block at `number`, or of the best block when `number` is `None`.
	pub async fn block_hash(&self, number: Option<u32>) -> Result<H256, RpcError> {
		self.request::<Option<H256>>(methods::CHAIN_GET_BLOCK_HASH, rpc_params![number])
			.await?
			.ok_or_else(|| match number {
				Some(n) => RpcError::missing(methods::CHAIN_GET_BLOCK_HASH, format!("hash for #{n}")),
				None => RpcError::missing(methods::CHAIN_GET_BLOCK_HASH, "best block hash"),
			})
	}

	/// Hash of the latest finalized block.
	pub async fn finalized_head(&self) -> Result<H256, RpcError> {
		self.request(methods::CHAIN_GET_FINALIZED_HEAD, rpc_params![]).await
	}

	/// Header of the block with `hash`, or of the best block when `hash` is `None`.
	pub async fn header(&self, hash: Option<H256>) -> Result<ChainHeader, RpcError> {
		self.request::<Option<ChainHeader>>(methods::CHAIN_GET_HEADER, rpc_params![hash])
			.await?
			.ok_or_else(|| RpcError::missing(methods::CHAIN_GET_HEADER, format!("header for {hash:?}")))
	}

	/// Full block with `hash`, or the best block when `hash` is `None`.
	pub async fn block(&self, hash: Option<H256>) -> Result<SignedBlock, RpcError> {
		self.request::<Option<SignedBlock>>(methods::CHAIN_GET_BLOCK, rpc_params![hash])
			.await?
			.ok_or_else(|| RpcError::missing(methods::CHAIN_GET_BLOCK, format!("block for {hash:?}")))
	}

	/// Subscribe to new best-block headers.
	///
	/// Headers are delivered in the order the node announces them.
	pub async fn subscribe_new_heads(&self) -> Result<HeadSubscription, RpcError> {
		let client = self.connection.client()?;
		log::debug!("RPC subscribe `{}`", methods::CHAIN_SUBSCRIBE_NEW_HEADS);
		let subscription = client
			.subscribe(
				methods::CHAIN_SUBSCRIBE_NEW_HEADS,
				rpc_params![],
				methods::CHAIN_UNSUBSCRIBE_NEW_HEADS,
			)
			.await
			.map_err(|e| RpcError::from_client(methods::CHAIN_SUBSCRIBE_NEW_HEADS, e))?;
		Ok(HeadSubscription { inner: Some(subscription) })
	}

	/// Runtime version at the best block.
	pub async fn runtime_version(&self) -> Result<RuntimeVersion, RpcError> {
		self.request(methods::STATE_GET_RUNTIME_VERSION, rpc_params![]).await
	}

	/// Encoded runtime metadata at the best block.
	pub async fn runtime_metadata(&self) -> Result<RuntimeMetadata, RpcError> {
		let bytes: Bytes = self.request(methods::STATE_GET_METADATA, rpc_params![]).await?;
		Ok(RuntimeMetadata(bytes.0))
	}

	/// A single storage value. `Ok(None)` means the key is empty.
	///
	/// # Arguments
	/// * `key` - The storage key (raw bytes)
	/// * `at` - The block to query, or the best block when `None`
	pub async fn storage(&self, key: &[u8], at: Option<H256>) -> Result<Option<Vec<u8>>, RpcError> {
		let key = Bytes::from(key.to_vec());
		let value: Option<Bytes> =
			self.request(methods::STATE_GET_STORAGE, rpc_params![key, at]).await?;
		Ok(value.map(|bytes| bytes.0))
	}

	/// A storage value decoded as `T`. A value that does not decode is an invalid response.
	async fn decoded_storage<T: Decode>(
		&self,
		key: &[u8],
		at: Option<H256>,
	) -> Result<Option<T>, RpcError> {
		let Some(value) = self.storage(key, at).await? else {
			return Ok(None);
		};
		T::decode(&mut value.as_slice()).map(Some).map_err(|e| RpcError::InvalidResponse {
			method: methods::STATE_GET_STORAGE,
			message: e.to_string(),
		})
	}

	/// `Timestamp::Now` in milliseconds, at `at` or the best block.
	pub async fn timestamp_now(&self, at: Option<H256>) -> Result<Option<u64>, RpcError> {
		self.decoded_storage(&storage::timestamp_now_key(), at).await
	}

	/// `System::Account` of `account`, at `at` or the best block. `Ok(None)` for unknown accounts.
	pub async fn system_account(
		&self,
		account: &AccountId32,
		at: Option<H256>,
	) -> Result<Option<AccountInfo>, RpcError> {
		self.decoded_storage(&storage::system_account_key(account), at).await
	}

	/// Values of `keys` for every block from `from` up to `to` (or the best block).
	///
	/// The first change set belongs to `from`; later sets only list keys that changed.
	pub async fn query_storage(
		&self,
		keys: &[Vec<u8>],
		from: H256,
		to: Option<H256>,
	) -> Result<Vec<StorageChangeSet>, RpcError> {
		let keys: Vec<Bytes> = keys.iter().cloned().map(Bytes::from).collect();
		self.request(methods::STATE_QUERY_STORAGE, rpc_params![keys, from, to]).await
	}

	/// Values of `keys` at a single block.
	pub async fn query_storage_at(
		&self,
		keys: &[Vec<u8>],
		at: Option<H256>,
	) -> Result<Vec<StorageChangeSet>, RpcError> {
		let keys: Vec<Bytes> = keys.iter().cloned().map(Bytes::from).collect();
		self.request(methods::STATE_QUERY_STORAGE_AT, rpc_params![keys, at]).await
	}

	/// Chain name.
	pub async fn system_chain(&self) -> Result<String, RpcError> {
		self.request(methods::SYSTEM_CHAIN, rpc_params![]).await
	}

	/// Chain properties (token decimals, symbols, SS58 format, ...).
	pub async fn system_properties(&self) -> Result<SystemProperties, RpcError> {
		self.request(methods::SYSTEM_PROPERTIES, rpc_params![]).await
	}

	/// Chain type.
	pub async fn system_chain_type(&self) -> Result<ChainType, RpcError> {
		self.request(methods::SYSTEM_CHAIN_TYPE, rpc_params![]).await
	}

	/// Node implementation name.
	pub async fn system_name(&self) -> Result<String, RpcError> {
		self.request(methods::SYSTEM_NAME, rpc_params![]).await
	}

	/// Node implementation version.
	pub async fn system_version(&self) -> Result<String, RpcError> {
		self.request(methods::SYSTEM_VERSION, rpc_params![]).await
	}

	/// GRANDPA finality proof for the block at `number`.
	///
	/// `Ok(None)` when the node has no proof to offer for that block.
	pub async fn prove_finality(&self, number: u32) -> Result<Option<FinalityProof>, RpcError> {
		self.request(methods::GRANDPA_PROVE_FINALITY, rpc_params![number]).await
	}
}

/// A live `chain_subscribeNewHeads` subscription.
///
/// Yields headers until [`HeadSubscription::unsubscribe`] is called or the node ends the stream.
#[derive(Debug)]
pub struct HeadSubscription {
	inner: Option<Subscription<ChainHeader>>,
}

impl HeadSubscription {
	/// The next header, or `None` once the subscription has ended.
	pub async fn next(&mut self) -> Option<Result<ChainHeader, RpcError>> {
		let subscription = self.inner.as_mut()?;
		match subscription.next().await {
			Some(Ok(header)) => Some(Ok(header)),
			Some(Err(e)) => Some(Err(RpcError::InvalidResponse {
				method: methods::CHAIN_NEW_HEAD,
				message: e.to_string(),
			})),
			None => {
				self.inner = None;
				None
			},
		}
	}

	/// Whether headers may still arrive.
	pub fn is_active(&self) -> bool {
		self.inner.is_some()
	}

	/// Stop delivery. Calling it again has no effect.
	pub async fn unsubscribe(&mut self) -> Result<(), RpcError> {
		let Some(subscription) = self.inner.take() else {
			return Ok(());
		};
		log::debug!("RPC unsubscribe `{}`", methods::CHAIN_UNSUBSCRIBE_NEW_HEADS);
		subscription
			.unsubscribe()
			.await
			.map_err(|e| RpcError::from_client(methods::CHAIN_UNSUBSCRIBE_NEW_HEADS, e))
	}
}
