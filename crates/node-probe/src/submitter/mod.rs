// SPDX-License-Identifier: GPL-3.0

//! Signed extrinsic submission.
//!
//! [`ExtrinsicSubmitter`] opens a subxt session next to a [`Connection`], resolves the calls it
//! builds against the runtime metadata once, and signs with sr25519 keypairs. Calls are built as
//! dynamic payloads at the resolved location, so runtimes with renamed or moved calls still work.

mod call_path;
mod status;

pub use call_path::{CallCandidates, CallName, CallPath, CallTable, calls};
pub use status::{ExtrinsicHash, ExtrinsicStatus, StatusStream, StatusTracker};

use crate::{Connection, error::SubmissionError};
use call_path::{set_code_call, sudo_call, transfer_call};
use subxt::{
	OnlineClient, SubstrateConfig, backend::rpc::RpcClient, tx::DynamicPayload,
	utils::AccountId32,
};
use subxt_signer::sr25519::Keypair;

fn client_setup(endpoint: &str, error: impl std::fmt::Display) -> SubmissionError {
	SubmissionError::ClientSetup { endpoint: endpoint.to_string(), message: error.to_string() }
}

/// Builds, signs and submits extrinsics to the node behind a [`Connection`].
pub struct ExtrinsicSubmitter<'a> {
	connection: &'a Connection,
	client: OnlineClient<SubstrateConfig>,
	transfer: Option<CallPath>,
	set_code: Option<CallPath>,
	sudo: Option<CallPath>,
}

impl<'a> ExtrinsicSubmitter<'a> {
	/// Set up a chain client for the node behind `connection` and resolve known calls.
	///
	/// Calls missing from the runtime are not an error here; using them is.
	pub async fn new(connection: &'a Connection) -> Result<Self, SubmissionError> {
		// Refuse to open a session for a closed connection.
		connection.client()?;
		let endpoint = connection.endpoint().as_str();
		let rpc = RpcClient::from_insecure_url(endpoint)
			.await
			.map_err(|e| client_setup(endpoint, e))?;
		let client = OnlineClient::<SubstrateConfig>::from_rpc_client(rpc)
			.await
			.map_err(|e| client_setup(endpoint, e))?;

		let metadata = client.metadata();
		let resolve = |candidates: CallCandidates| match candidates.resolve(&metadata) {
			Ok(path) => Some(path),
			Err(e) => {
				log::warn!("{e}");
				None
			},
		};
		let transfer = resolve(calls::TRANSFER);
		let set_code = resolve(calls::SET_CODE);
		let sudo = resolve(calls::SUDO);

		Ok(Self { connection, client, transfer, set_code, sudo })
	}

	/// The connection this submitter was created for.
	pub fn connection(&self) -> &'a Connection {
		self.connection
	}

	/// Where the runtime keeps the transfer call.
	pub fn transfer_path(&self) -> Result<CallPath, SubmissionError> {
		self.transfer.ok_or_else(|| calls::TRANSFER.unsupported())
	}

	/// Where the runtime keeps the set_code call.
	pub fn set_code_path(&self) -> Result<CallPath, SubmissionError> {
		self.set_code.ok_or_else(|| calls::SET_CODE.unsupported())
	}

	/// Sign and submit a balance transfer without waiting for inclusion.
	///
	/// # Arguments
	/// * `signer` - The sending account.
	/// * `dest` - The receiving account.
	/// * `amount` - Amount in the chain's smallest unit.
	pub async fn submit_transfer(
		&self,
		signer: &Keypair,
		dest: &AccountId32,
		amount: u128,
	) -> Result<ExtrinsicHash, SubmissionError> {
		let call = transfer_call(self.transfer_path()?, dest, amount);
		let hash = self
			.client
			.tx()
			.sign_and_submit_default(&call, signer)
			.await
			.map_err(|e| SubmissionError::Rejected(e.to_string()))?;
		log::info!("Submitted transfer of {amount} to {dest}: {hash:?}");
		Ok(hash)
	}

	/// Sign and submit `inner_call` wrapped in `Sudo.sudo`, watching its status.
	///
	/// Returns as soon as the node accepts the extrinsic.
	pub async fn submit_sudo_call(
		&self,
		signer: &Keypair,
		inner_call: DynamicPayload,
	) -> Result<StatusStream, SubmissionError> {
		let sudo = self.sudo.ok_or_else(|| calls::SUDO.unsupported())?;
		let (pallet, call) = (inner_call.pallet_name(), inner_call.call_name());
		log::debug!("Wrapping {pallet}.{call} in {}", sudo.name());
		let call = sudo_call(sudo, inner_call);
		let progress = self
			.client
			.tx()
			.sign_and_submit_then_watch_default(&call, signer)
			.await
			.map_err(|e| SubmissionError::Rejected(e.to_string()))?;
		let stream = StatusStream::new(progress);
		log::info!("Submitted sudo call: {:?}", stream.extrinsic_hash());
		Ok(stream)
	}

	/// `set_code(code)` at whichever location the runtime uses.
	pub fn set_code_call(&self, code: &[u8]) -> Result<DynamicPayload, SubmissionError> {
		let path = self.set_code_path()?;
		if path.is_legacy() {
			log::info!("Using legacy set_code call path {}", path.name());
		}
		Ok(set_code_call(path, code))
	}

	/// Replace the runtime with `code` through `Sudo.sudo(set_code(code))`.
	pub async fn upgrade_runtime(
		&self,
		signer: &Keypair,
		code: &[u8],
	) -> Result<StatusStream, SubmissionError> {
		let inner = self.set_code_call(code)?;
		log::info!("Upgrading runtime with {} bytes of code", code.len());
		self.submit_sudo_call(signer, inner).await
	}
}
