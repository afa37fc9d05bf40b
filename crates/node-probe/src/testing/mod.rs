// SPDX-License-Identifier: GPL-3.0

//! An in-process node double for tests.
//!
//! [`MockNode`] serves the chain, state, system and grandpa methods the harness uses over a real
//! WebSocket server, and produces a block every [`MockNodeConfig::block_time`]. It cannot decode
//! or include extrinsics.

mod chain;
mod rpc;

use crate::types::{ChainType, HeaderExt};
use chain::MockChain;
use jsonrpsee::server::{ServerBuilder, ServerHandle};
use rpc::{NodeRpcImpl, NodeRpcServer, lock};
use std::{
	net::SocketAddr,
	sync::{Arc, Mutex},
	time::Duration,
};
use subxt::config::substrate::H256;
use tokio::{sync::broadcast, task::JoinHandle};
use url::Url;

/// Configuration of a [`MockNode`].
#[derive(Debug, Clone)]
pub struct MockNodeConfig {
	/// Chain name reported by `system_chain`.
	pub chain: String,
	/// Chain type reported by `system_chainType`.
	pub chain_type: ChainType,
	/// Runtime spec name.
	pub spec_name: String,
	/// Number of runtime APIs the runtime version lists.
	pub api_count: usize,
	/// SS58 prefix in the chain properties.
	pub ss58_format: u16,
	/// Blocks on top of genesis at startup.
	pub initial_blocks: u32,
	/// Interval between produced blocks. `None` freezes the chain.
	pub block_time: Option<Duration>,
	/// Delay added before every method response.
	pub response_delay: Duration,
}

impl Default for MockNodeConfig {
	fn default() -> Self {
		Self {
			chain: "Westend Local Testnet".to_string(),
			chain_type: ChainType::Local,
			spec_name: "westend".to_string(),
			api_count: 12,
			ss58_format: 42,
			initial_blocks: 2,
			block_time: Some(Duration::from_millis(100)),
			response_delay: Duration::ZERO,
		}
	}
}

impl MockNodeConfig {
	/// Default configuration with block production disabled.
	pub fn without_block_production() -> Self {
		Self { block_time: None, ..Default::default() }
	}
}

/// A running mock node. Stops serving when dropped.
pub struct MockNode {
	addr: SocketAddr,
	handle: ServerHandle,
	chain: Arc<Mutex<MockChain>>,
	producer: Option<JoinHandle<()>>,
}

impl MockNode {
	/// Start a node with the default configuration.
	pub async fn start() -> Self {
		Self::start_with(MockNodeConfig::default()).await
	}

	/// Start a node with the given configuration on a random local port.
	pub async fn start_with(config: MockNodeConfig) -> Self {
		let server = ServerBuilder::default()
			.build("127.0.0.1:0")
			.await
			.expect("Failed to bind mock node");
		let addr = server.local_addr().expect("Mock node has a local address");

		let chain = Arc::new(Mutex::new(MockChain::new(config.initial_blocks)));
		let (heads, _) = broadcast::channel(64);

		let producer = config.block_time.map(|block_time| {
			let chain = Arc::clone(&chain);
			let heads = heads.clone();
			tokio::spawn(async move {
				let mut interval = tokio::time::interval(block_time);
				// The first tick completes immediately.
				interval.tick().await;
				loop {
					interval.tick().await;
					let header = lock(&chain).produce_block();
					// No subscribers is fine.
					let _ = heads.send(header);
				}
			})
		});

		let methods = NodeRpcImpl { config, chain: Arc::clone(&chain), heads };
		let handle = server.start(methods.into_rpc());

		Self { addr, handle, chain, producer }
	}

	/// WebSocket URL of the node.
	pub fn endpoint(&self) -> Url {
		Url::parse(&format!("ws://{}", self.addr)).expect("Socket address forms a valid URL")
	}

	/// Hash of the best block.
	pub fn best_hash(&self) -> H256 {
		lock(&self.chain).best().hash()
	}

	/// Hash of the block at `number`, if produced.
	pub fn block_hash(&self, number: u32) -> Option<H256> {
		lock(&self.chain).header_at(number).map(HeaderExt::hash)
	}

	/// The storage entries the node serves, as (key, value) pairs.
	pub fn storage_entries(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
		lock(&self.chain).storage_entries()
	}

	/// Stop serving and close every open connection.
	pub async fn stop(mut self) {
		self.halt();
		self.handle.clone().stopped().await;
	}

	fn halt(&mut self) {
		if let Some(producer) = self.producer.take() {
			producer.abort();
		}
		// Already stopped is fine.
		let _ = self.handle.stop();
	}
}

impl Drop for MockNode {
	fn drop(&mut self) {
		self.halt();
	}
}

/// A WebSocket URL on which nothing listens.
pub async fn unused_endpoint() -> Url {
	let listener =
		tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind a free port");
	let addr = listener.local_addr().expect("Listener has a local address");
	drop(listener);
	Url::parse(&format!("ws://{addr}")).expect("Socket address forms a valid URL")
}
