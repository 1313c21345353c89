// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request authentication by signature recovery.

use crate::ecc::RecoverableSignature;

use super::error::{WalletError, WalletResult};

/// Resolve the identity that signed `digest`.
///
/// The signer's key is recovered from the signature, then the signature is
/// verified against that key. Recovery alone proves nothing: a malformed
/// `(r, s)` still recovers to some point. The identity is always the
/// compressed public key string, whatever encoding the signer used.
pub fn authenticate(
    digest: &[u8; 32],
    signature: &RecoverableSignature,
    prefix: &str,
) -> WalletResult<String> {
    let recovered = signature.recover_public_key(digest)?;
    if !signature.verify(digest, &recovered) {
        return Err(WalletError::Unauthorized);
    }
    Ok(recovered
        .with_compression(true)
        .to_public_key_string(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::hash::sha256;
    use crate::ecc::{EccError, PrivateKey};

    const PREFIX: &str = "GPH";

    #[test]
    fn identity_is_compressed_key_string() {
        let key = PrivateKey::from_seed(b"").unwrap();
        let digest = sha256(b"data");
        let expected = key.public_key().to_public_key_string(PREFIX);

        for compressed in [true, false] {
            let signature = RecoverableSignature::sign(&digest, &key, compressed).unwrap();
            assert_eq!(authenticate(&digest, &signature, PREFIX).unwrap(), expected);
        }
    }

    #[test]
    fn other_digest_authenticates_someone_else() {
        let key = PrivateKey::from_seed(b"").unwrap();
        let signature = RecoverableSignature::sign(&sha256(b"data"), &key, true).unwrap();

        // Either recovery fails outright or it yields a different identity.
        match authenticate(&sha256(b"data2"), &signature, PREFIX) {
            Ok(identity) => {
                assert_ne!(identity, key.public_key().to_public_key_string(PREFIX))
            }
            Err(err) => assert!(matches!(
                err,
                WalletError::Unauthorized | WalletError::Key(EccError::PointNotOnCurve)
            )),
        }
    }

    #[test]
    fn high_s_signature_authenticates_signer() {
        let key = PrivateKey::from_seed(b"").unwrap();
        let digest = sha256(b"data");
        let low = RecoverableSignature::sign(&digest, &key, true).unwrap();

        // Same signature as (r, n - s) with the opposite y parity.
        let negated: k256::FieldBytes = (-*k256::ecdsa::Signature::from_scalars(*low.r(), *low.s())
            .unwrap()
            .s())
        .into();
        let mut high_s = [0u8; 32];
        high_s.copy_from_slice(&negated);
        let high = RecoverableSignature::new(
            *low.r(),
            high_s,
            low.candidate().with_flipped_y().recovery_id(),
            true,
        )
        .unwrap();

        assert_eq!(
            authenticate(&digest, &high, PREFIX).unwrap(),
            key.public_key().to_public_key_string(PREFIX)
        );
    }

    #[test]
    fn zero_scalars_are_rejected() {
        let signature = RecoverableSignature::new([0; 32], [0; 32], 0, true).unwrap();
        let err = authenticate(&sha256(b"data"), &signature, PREFIX).unwrap_err();
        assert!(matches!(err, WalletError::Key(_)));
    }
}
