// SPDX-License-Identifier: GPL-3.0

//! Pallet and storage item names of the entries the facade decodes.

pub mod pallets {
	pub const BABE: &str = "Babe";
	pub const BALANCES: &str = "Balances";
	pub const SYSTEM: &str = "System";
	pub const TIMESTAMP: &str = "Timestamp";
}

pub mod items {
	pub const ACCOUNT: &str = "Account";
	pub const CURRENT_SLOT: &str = "CurrentSlot";
	pub const NOW: &str = "Now";
	pub const TOTAL_ISSUANCE: &str = "TotalIssuance";
}
