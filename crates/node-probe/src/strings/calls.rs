// SPDX-License-Identifier: GPL-3.0

//! Pallet and call names looked up in the runtime metadata.

pub mod pallets {
	pub const BALANCES: &str = "Balances";
	pub const CONSENSUS: &str = "Consensus";
	pub const SUDO: &str = "Sudo";
	pub const SYSTEM: &str = "System";
}

pub mod names {
	pub const SET_CODE: &str = "set_code";
	pub const SUDO: &str = "sudo";
	pub const TRANSFER: &str = "transfer";
	pub const TRANSFER_ALLOW_DEATH: &str = "transfer_allow_death";
}
