// SPDX-License-Identifier: GPL-3.0

use crate::error::SubmissionError;
use std::str::FromStr;
use subxt::utils::AccountId32;
use subxt_signer::{SecretUri, sr25519::Keypair};

/// Create an sr25519 keypair from a secret URI such as `//Alice`.
///
/// # Arguments
/// * `suri` - Secret URI: a mnemonic, a hex seed, or a dev derivation path.
pub fn create_signer(suri: &str) -> Result<Keypair, SubmissionError> {
	let uri = SecretUri::from_str(suri).map_err(|e| SubmissionError::InvalidSigner(e.to_string()))?;
	Keypair::from_uri(&uri).map_err(|e| SubmissionError::InvalidSigner(e.to_string()))
}

/// Parse an SS58 address.
///
/// # Arguments
/// * `address` - The SS58-encoded account address.
pub fn parse_account(address: &str) -> Result<AccountId32, SubmissionError> {
	AccountId32::from_str(address).map_err(|e| SubmissionError::InvalidAddress {
		address: address.to_string(),
		message: e.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
	const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

	#[test]
	fn create_signer_works() -> Result<(), SubmissionError> {
		let keypair = create_signer("//Alice")?;
		assert_eq!(keypair.public_key().to_account_id().to_string(), ALICE);
		Ok(())
	}

	#[test]
	fn create_signer_fails_wrong_key() {
		assert!(matches!(create_signer("11111"), Err(SubmissionError::InvalidSigner(..))));
	}

	#[test]
	fn parse_account_works() -> Result<(), SubmissionError> {
		let account = parse_account(BOB)?;
		assert_eq!(account.to_string(), BOB);
		Ok(())
	}

	#[test]
	fn parse_account_fails_wrong_value() {
		assert!(matches!(
			parse_account("5CLPm1CeUvJhZ8GCDZCR7"),
			Err(SubmissionError::InvalidAddress { .. })
		));
		assert!(matches!(parse_account("wrongaccount"), Err(SubmissionError::InvalidAddress { .. })));
	}
}
