// SPDX-License-Identifier: GPL-3.0

//! Call-path resolution against the runtime's call table.
//!
//! Some calls moved between pallets or were renamed across runtime versions. A
//! [`CallCandidates`] names the current location of a call and, optionally, the legacy one.
//! Resolving it once against the node's metadata yields a [`CallPath`] that records which of the
//! two the runtime actually exposes.

use crate::{
	error::SubmissionError,
	strings::calls::{names, pallets},
};
use std::fmt;
use subxt::{
	dynamic::{Value, tx},
	tx::DynamicPayload,
	utils::AccountId32,
};

/// Anything that can tell whether the runtime exposes `pallet.call`.
pub trait CallTable {
	/// Whether the runtime has a call named `call` in `pallet`.
	fn has_call(&self, pallet: &str, call: &str) -> bool;
}

impl CallTable for subxt::Metadata {
	fn has_call(&self, pallet: &str, call: &str) -> bool {
		self.pallet_by_name(pallet).and_then(|p| p.call_variant_by_name(call)).is_some()
	}
}

/// A pallet and call name pair, e.g. `System.set_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallName {
	/// Pallet name as it appears in the metadata.
	pub pallet: &'static str,
	/// Call name as it appears in the metadata.
	pub call: &'static str,
}

impl fmt::Display for CallName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.pallet, self.call)
	}
}

/// Where a call lives in current runtimes, and where it lived before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallCandidates {
	/// The current location of the call.
	pub primary: CallName,
	/// The location in older runtimes, if it ever moved.
	pub legacy: Option<CallName>,
}

impl CallCandidates {
	/// Resolve against `table`: the primary path wins, the legacy path is the fallback.
	pub fn resolve(&self, table: &impl CallTable) -> Result<CallPath, SubmissionError> {
		if table.has_call(self.primary.pallet, self.primary.call) {
			return Ok(CallPath::Primary(self.primary));
		}
		if let Some(legacy) = self.legacy &&
			table.has_call(legacy.pallet, legacy.call)
		{
			log::info!("{} not found in runtime, using legacy {legacy}", self.primary);
			return Ok(CallPath::Legacy(legacy));
		}
		Err(self.unsupported())
	}

	/// Error reported when neither candidate exists.
	pub(crate) fn unsupported(&self) -> SubmissionError {
		SubmissionError::UnsupportedCall { candidates: self.to_string() }
	}
}

impl fmt::Display for CallCandidates {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.legacy {
			Some(legacy) => write!(f, "{}, {legacy}", self.primary),
			None => write!(f, "{}", self.primary),
		}
	}
}

/// A call resolved against a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPath {
	/// The runtime exposes the call at its current location.
	Primary(CallName),
	/// The runtime only exposes the legacy location.
	Legacy(CallName),
}

impl CallPath {
	/// The pallet and call name the runtime exposes.
	pub fn name(&self) -> CallName {
		match self {
			CallPath::Primary(name) | CallPath::Legacy(name) => *name,
		}
	}

	/// A dynamic call at the resolved location, encoded against the metadata on submission.
	pub fn payload(&self, fields: Vec<Value>) -> DynamicPayload {
		let name = self.name();
		tx(name.pallet, name.call, fields)
	}

	/// Whether the call resolved to its legacy location.
	pub fn is_legacy(&self) -> bool {
		matches!(self, CallPath::Legacy(_))
	}
}

/// Calls the submitter knows how to build.
pub mod calls {
	use super::*;

	/// Runtime upgrade. Older runtimes kept it in the `Consensus` pallet.
	pub const SET_CODE: CallCandidates = CallCandidates {
		primary: CallName { pallet: pallets::SYSTEM, call: names::SET_CODE },
		legacy: Some(CallName { pallet: pallets::CONSENSUS, call: names::SET_CODE }),
	};

	/// Balance transfer. Renamed from `transfer` to `transfer_allow_death`.
	pub const TRANSFER: CallCandidates = CallCandidates {
		primary: CallName { pallet: pallets::BALANCES, call: names::TRANSFER_ALLOW_DEATH },
		legacy: Some(CallName { pallet: pallets::BALANCES, call: names::TRANSFER }),
	};

	/// Dispatch a call with root origin.
	pub const SUDO: CallCandidates =
		CallCandidates { primary: CallName { pallet: pallets::SUDO, call: names::SUDO }, legacy: None };
}

/// `transfer(dest: MultiAddress::Id(dest), value: Compact<u128>)`.
pub(crate) fn transfer_call(path: CallPath, dest: &AccountId32, amount: u128) -> DynamicPayload {
	path.payload(vec![Value::unnamed_variant("Id", [Value::from_bytes(dest.0)]), Value::u128(amount)])
}

/// `set_code(code: Vec<u8>)`.
pub(crate) fn set_code_call(path: CallPath, code: &[u8]) -> DynamicPayload {
	path.payload(vec![Value::from_bytes(code)])
}

/// `sudo(call: Box<RuntimeCall>)`.
pub(crate) fn sudo_call(path: CallPath, inner: DynamicPayload) -> DynamicPayload {
	path.payload(vec![inner.into_value()])
}
