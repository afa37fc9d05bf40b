// SPDX-License-Identifier: GPL-3.0

//! The conformance cases, grouped by RPC namespace.
//!
//! Cases run in declaration order. The runtime upgrade comes last because it changes the runtime
//! every other case observes.

use anyhow::{Context, ensure};
use node_probe::{
	CaseFuture, ChainType, ExtrinsicSubmitter, H256, HarnessContext, HeaderExt, LIBRARY_INFO,
	RuntimeMetadata, RuntimeVersionExt, Skip, TestCase, create_signer, parse_account, storage,
};
use std::{collections::HashSet, path::PathBuf};

/// Storage keys queried by the storage case: Babe::CurrentSlot and Balances::TotalIssuance.
fn storage_keys() -> Vec<Vec<u8>> {
	vec![storage::current_slot_key(), storage::total_issuance_key()]
}

/// Expectations and inputs of the suite.
#[derive(Debug, Clone)]
pub(crate) struct SuiteOptions {
	pub(crate) suri: String,
	pub(crate) dest: String,
	pub(crate) amount: u128,
	pub(crate) runtime: PathBuf,
	pub(crate) expect_spec_name: String,
	pub(crate) expect_chain: String,
	pub(crate) min_apis: usize,
}

type SuiteContext = HarnessContext<SuiteOptions>;

/// Every case of the suite, in execution order.
pub(crate) fn cases() -> Vec<TestCase<SuiteOptions>> {
	vec![
		TestCase::new("constants", "genesis_hash", genesis_hash),
		TestCase::new("constants", "runtime_metadata", runtime_metadata),
		TestCase::new("constants", "runtime_version", runtime_version),
		TestCase::new("constants", "library_info", library_info),
		TestCase::new("system", "chain", system_chain),
		TestCase::new("system", "properties", system_properties),
		TestCase::new("system", "chain_type", system_chain_type),
		TestCase::new("chain", "header", header),
		TestCase::new("chain", "subscribe_new_heads", subscribe_new_heads),
		TestCase::new("chain", "block_hash", block_hash),
		TestCase::new("chain", "block", block),
		TestCase::new("state", "query_storage", query_storage),
		TestCase::new("grandpa", "prove_finality", prove_finality),
		TestCase::new("query", "timestamp_now", timestamp_now),
		TestCase::new("query", "system_account", system_account),
		TestCase::new("tx", "transfer", transfer),
		TestCase::new("upgrade", "set_code", set_code),
	]
}

fn ensure_hash(name: &str, hash: &H256) -> anyhow::Result<()> {
	ensure!(hash.as_bytes().len() == 32, "{name} is {} bytes, expected 32", hash.as_bytes().len());
	Ok(())
}

fn genesis_hash(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let hash = ctx.api().genesis_hash().await?;
		ensure_hash("genesis hash", &hash)?;
		ensure!(!hash.is_zero(), "genesis hash is zero");
		Ok(())
	})
}

fn runtime_metadata(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let metadata = ctx.api().runtime_metadata().await?;
		ensure!(
			metadata.magic_number() == Some(RuntimeMetadata::MAGIC_NUMBER),
			"expected magic number {:#x}, got {:?}",
			RuntimeMetadata::MAGIC_NUMBER,
			metadata.magic_number()
		);
		Ok(())
	})
}

fn runtime_version(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let options = ctx.suite();
		let version = ctx.api().runtime_version().await?;
		let spec_name = version.spec_name().context("runtime version has no specName")?;
		ensure!(
			spec_name.contains(&options.expect_spec_name),
			"expected spec name containing {:?}, got {spec_name:?}",
			options.expect_spec_name
		);
		let apis = version.apis().len();
		ensure!(
			apis >= options.min_apis,
			"expected at least {} runtime apis, got {apis}",
			options.min_apis
		);
		Ok(())
	})
}

fn library_info(_: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		ensure!(
			LIBRARY_INFO.starts_with("node-probe v"),
			"unexpected library info {LIBRARY_INFO:?}"
		);
		Ok(())
	})
}

fn system_chain(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let expected = &ctx.suite().expect_chain;
		let chain = ctx.api().system_chain().await?;
		ensure!(
			chain.contains(expected.as_str()),
			"expected chain containing {expected:?}, got {chain:?}"
		);
		Ok(())
	})
}

fn system_properties(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let properties = ctx.api().system_properties().await?;
		ensure!(properties.contains_key("ss58Format"), "ss58Format missing from {properties:?}");
		Ok(())
	})
}

fn system_chain_type(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let chain_type = ctx.api().system_chain_type().await?;
		ensure!(chain_type == ChainType::Local, "expected Local, got {chain_type:?}");
		Ok(())
	})
}

fn header(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let header = ctx.api().header(None).await?;
		ensure_hash("parent hash", &header.parent_hash)?;
		ensure_hash("state root", &header.state_root)?;
		ensure_hash("extrinsics root", &header.extrinsics_root)?;
		Ok(())
	})
}

fn subscribe_new_heads(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let mut subscription = ctx.api().subscribe_new_heads().await?;
		let mut seen = HashSet::new();
		while seen.len() < 2 {
			let header = subscription
				.next()
				.await
				.context("subscription ended before two headers arrived")??;
			ensure_hash("header hash", &header.hash())?;
			seen.insert(header.hash());
		}
		subscription.unsubscribe().await?;
		ensure!(subscription.next().await.is_none(), "header delivered after unsubscribe");
		Ok(())
	})
}

fn block_hash(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let api = ctx.api();
		let first = api.block_hash(Some(0)).await?;
		let second = api.block_hash(Some(0)).await?;
		ensure_hash("block hash", &first)?;
		ensure!(first == second, "block_hash(0) changed from {first:?} to {second:?}");
		Ok(())
	})
}

fn block(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let block = ctx.api().block(None).await?;
		ensure_hash("parent hash", &block.block.header.parent_hash)?;
		ensure!(!block.block.extrinsics.is_empty(), "best block has no extrinsics");
		Ok(())
	})
}

fn query_storage(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let api = ctx.api();
		let keys = storage_keys();
		let genesis = api.block_hash(Some(0)).await?;
		let result = api.query_storage(&keys, genesis, None).await?;
		let first = result.first().context("no change sets returned")?;
		ensure!(first.block == genesis, "expected block {genesis:?}, got {:?}", first.block);
		ensure!(
			first.changes.len() == keys.len(),
			"expected {} changes in the first set, got {}",
			keys.len(),
			first.changes.len()
		);
		Ok(())
	})
}

fn prove_finality(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let proof = ctx.api().prove_finality(0).await?;
		log::debug!("Finality proof for #0: {proof:?}");
		Ok(())
	})
}

fn timestamp_now(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let now = ctx.api().timestamp_now(None).await?.context("Timestamp::Now is empty")?;
		ensure!(now > 0, "Timestamp::Now is zero");
		Ok(())
	})
}

fn system_account(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let account = create_signer(&ctx.suite().suri)?.public_key().to_account_id();
		let info = ctx
			.api()
			.system_account(&account, None)
			.await?
			.with_context(|| format!("no System::Account entry for {account}"))?;
		log::debug!("{account}: free {}, nonce {}", info.data.free, info.nonce);
		ensure!(info.data.free > 0, "{account} has no free balance");
		Ok(())
	})
}

fn transfer(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let options = ctx.suite();
		let signer = create_signer(&options.suri)?;
		let dest = parse_account(&options.dest)?;
		let submitter = ExtrinsicSubmitter::new(ctx.connection()).await?;
		let hash = submitter.submit_transfer(&signer, &dest, options.amount).await?;
		ensure_hash("extrinsic hash", &hash)?;
		ensure!(!hash.is_zero(), "extrinsic hash is zero");
		Ok(())
	})
}

fn set_code(ctx: &SuiteContext) -> CaseFuture<'_> {
	Box::pin(async move {
		let options = ctx.suite();
		if !options.runtime.exists() {
			return Err(Skip(format!("{} not found", options.runtime.display())).into());
		}
		let code = std::fs::read(&options.runtime)
			.with_context(|| format!("failed to read {}", options.runtime.display()))?;
		let signer = create_signer(&options.suri)?;
		let submitter = ExtrinsicSubmitter::new(ctx.connection()).await?;
		let block = submitter.upgrade_runtime(&signer, &code).await?.wait_for_finalized().await?;
		log::info!("Runtime upgrade finalized in {block:?}");
		Ok(())
	})
}
