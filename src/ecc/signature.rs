// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recoverable ECDSA signatures over secp256k1.
//!
//! A signature carries `(r, s)` plus a recovery id that selects one of the
//! four public keys algebraically consistent with `(r, s, digest)`. The
//! server never receives a public key: it recovers one from the signature
//! and then checks the signature against it.
//!
//! ## Wire Format
//!
//! ```text
//! [header: 1][r: 32][s: 32]    header = 27 + recovery_id + (compressed ? 4 : 0)
//! ```

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use super::error::{EccError, EccResult};
use super::key::{PrivateKey, PublicKey};

/// Length of the wire encoding.
pub const SIGNATURE_LEN: usize = 65;

/// Offset added to the recovery id in the header byte.
const HEADER_BASE: u8 = 27;

/// Header bit marking a compressed-key signer.
const COMPRESSED_FLAG: u8 = 4;

/// `p - n` for secp256k1, big-endian. An `r` below this value may also be
/// the reduction of the x-coordinate `r + n`.
const P_MINUS_N: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    0x45, 0x51, 0x23, 0x19, 0x50, 0xb7, 0x5f, 0xc4, 0x40, 0x2d, 0xa1, 0x72, 0x2f, 0xc9, 0xba, 0xee,
];

/// The four candidate points for a given `(r, s, digest)`.
///
/// The candidate point `R` has x-coordinate `r` (or `r + n` when the
/// x-coordinate was reduced modulo the group order) and a y-coordinate of
/// the stated parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCandidate {
    EvenY,
    OddY,
    EvenYReducedX,
    OddYReducedX,
}

impl RecoveryCandidate {
    pub const ALL: [RecoveryCandidate; 4] = [
        RecoveryCandidate::EvenY,
        RecoveryCandidate::OddY,
        RecoveryCandidate::EvenYReducedX,
        RecoveryCandidate::OddYReducedX,
    ];

    pub fn from_recovery_id(id: u8) -> EccResult<Self> {
        match id {
            0 => Ok(RecoveryCandidate::EvenY),
            1 => Ok(RecoveryCandidate::OddY),
            2 => Ok(RecoveryCandidate::EvenYReducedX),
            3 => Ok(RecoveryCandidate::OddYReducedX),
            other => Err(EccError::InvalidRecoveryId(other)),
        }
    }

    pub fn recovery_id(self) -> u8 {
        match self {
            RecoveryCandidate::EvenY => 0,
            RecoveryCandidate::OddY => 1,
            RecoveryCandidate::EvenYReducedX => 2,
            RecoveryCandidate::OddYReducedX => 3,
        }
    }

    pub fn is_y_odd(self) -> bool {
        matches!(
            self,
            RecoveryCandidate::OddY | RecoveryCandidate::OddYReducedX
        )
    }

    pub fn is_x_reduced(self) -> bool {
        matches!(
            self,
            RecoveryCandidate::EvenYReducedX | RecoveryCandidate::OddYReducedX
        )
    }

    /// Whether this candidate can exist for the given `r`.
    ///
    /// Plain candidates always can. A reduced-x candidate needs `r + n` to
    /// still be a field element, i.e. `r < p - n`.
    pub fn is_feasible(self, r: &[u8; 32]) -> bool {
        !self.is_x_reduced() || r < &P_MINUS_N
    }

    /// The candidate for the same point with the opposite y-coordinate.
    pub fn with_flipped_y(self) -> Self {
        match self {
            RecoveryCandidate::EvenY => RecoveryCandidate::OddY,
            RecoveryCandidate::OddY => RecoveryCandidate::EvenY,
            RecoveryCandidate::EvenYReducedX => RecoveryCandidate::OddYReducedX,
            RecoveryCandidate::OddYReducedX => RecoveryCandidate::EvenYReducedX,
        }
    }

    fn to_k256(self) -> RecoveryId {
        RecoveryId::new(self.is_y_odd(), self.is_x_reduced())
    }
}

/// An ECDSA signature with the information needed to recover its signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    r: [u8; 32],
    s: [u8; 32],
    candidate: RecoveryCandidate,
    compressed: bool,
}

impl RecoverableSignature {
    pub fn new(r: [u8; 32], s: [u8; 32], recovery_id: u8, compressed: bool) -> EccResult<Self> {
        Ok(Self {
            r,
            s,
            candidate: RecoveryCandidate::from_recovery_id(recovery_id)?,
            compressed,
        })
    }

    /// Parse the 65-byte wire form.
    pub fn from_bytes(bytes: &[u8]) -> EccResult<Self> {
        if bytes.len() != SIGNATURE_LEN {
            return Err(EccError::MalformedSignature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let header = bytes[0];
        let flags = header
            .checked_sub(HEADER_BASE)
            .filter(|flags| *flags < 2 * COMPRESSED_FLAG)
            .ok_or(EccError::InvalidRecoveryId(header))?;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);

        Self::new(r, s, flags & 3, flags & COMPRESSED_FLAG != 0)
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[0] = HEADER_BASE
            + self.candidate.recovery_id()
            + if self.compressed { COMPRESSED_FLAG } else { 0 };
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Sign a 32-byte digest (RFC 6979 nonce, low-S).
    pub fn sign(digest: &[u8; 32], key: &PrivateKey, compressed: bool) -> EccResult<Self> {
        let (signature, recovery_id) = key
            .signing_key()
            .sign_prehash_recoverable(digest)
            .map_err(|e| EccError::MalformedSignature(e.to_string()))?;

        let bytes = signature.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);

        Self::new(r, s, recovery_id.to_byte(), compressed)
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    pub fn candidate(&self) -> RecoveryCandidate {
        self.candidate
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    fn ecdsa(&self) -> EccResult<Signature> {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        Signature::from_slice(&bytes).map_err(|e| EccError::MalformedSignature(e.to_string()))
    }

    /// `(r, s)` with `s` moved into the lower half of the group order.
    ///
    /// `(r, n - s)` is the same signature with `R` negated, so the candidate's
    /// y parity flips along with `s`.
    fn low_s(&self, candidate: RecoveryCandidate) -> EccResult<(Signature, RecoveryCandidate)> {
        let signature = self.ecdsa()?;
        Ok(match signature.normalize_s() {
            Some(normalized) => (normalized, candidate.with_flipped_y()),
            None => (signature, candidate),
        })
    }

    /// Standard ECDSA verification of `(r, s)` for `digest` under `key`.
    /// The recovery id plays no part. High-S signatures are accepted.
    pub fn verify(&self, digest: &[u8; 32], key: &PublicKey) -> bool {
        match self.low_s(self.candidate) {
            Ok((signature, _)) => key
                .verifying_key()
                .verify_prehash(digest, &signature)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Recover the signer's key using this signature's own candidate.
    pub fn recover_public_key(&self, digest: &[u8; 32]) -> EccResult<PublicKey> {
        self.recover_candidate(digest, self.candidate)
    }

    /// Recover the key a specific candidate yields.
    ///
    /// Every feasible candidate produces *some* key. Only the one selected
    /// by the signer's recovery id yields the signer's key.
    pub fn recover_candidate(
        &self,
        digest: &[u8; 32],
        candidate: RecoveryCandidate,
    ) -> EccResult<PublicKey> {
        if !candidate.is_feasible(&self.r) {
            return Err(EccError::PointNotOnCurve);
        }
        let (signature, candidate) = self.low_s(candidate)?;
        let key = VerifyingKey::recover_from_prehash(digest, &signature, candidate.to_k256())
            .map_err(|_| EccError::PointNotOnCurve)?;
        Ok(PublicKey::from_verifying_key(&key, self.compressed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecc::hash::sha256;

    fn key(seed: &str) -> PrivateKey {
        PrivateKey::from_seed(seed.as_bytes()).unwrap()
    }

    #[test]
    fn recovers_signer_key() {
        for seed in ["", "2", "nobody"] {
            let private_key = key(seed);
            let digest = sha256(format!("payload-{seed}").as_bytes());
            let signature = RecoverableSignature::sign(&digest, &private_key, true).unwrap();

            let recovered = signature.recover_public_key(&digest).unwrap();
            assert_eq!(recovered, private_key.public_key());
            assert!(signature.verify(&digest, &recovered));
        }
    }

    #[test]
    fn compression_flag_carries_into_recovered_key() {
        let private_key = key("");
        let digest = sha256(b"data");
        let signature = RecoverableSignature::sign(&digest, &private_key, false).unwrap();

        let recovered = signature.recover_public_key(&digest).unwrap();
        assert!(!recovered.is_compressed());
        assert_eq!(recovered.with_compression(true), private_key.public_key());
    }

    #[test]
    fn verification_fails_for_other_digest() {
        let private_key = key("");
        let digest = sha256(b"data");
        let other = sha256(b"data2");
        let signature = RecoverableSignature::sign(&digest, &private_key, true).unwrap();

        assert!(signature.verify(&digest, &private_key.public_key()));
        assert!(!signature.verify(&other, &private_key.public_key()));

        // Recovering against the wrong digest yields a different key, if any.
        if let Ok(recovered) = signature.recover_public_key(&other) {
            assert_ne!(recovered, private_key.public_key());
        }
    }

    #[test]
    fn verification_fails_for_other_key() {
        let digest = sha256(b"data");
        let signature = RecoverableSignature::sign(&digest, &key(""), true).unwrap();
        assert!(!signature.verify(&digest, &key("2").public_key()));
    }

    #[test]
    fn only_the_selected_candidate_yields_the_signer() {
        let private_key = key("");
        let digest = sha256(b"data");
        let signature = RecoverableSignature::sign(&digest, &private_key, true).unwrap();

        let matching: Vec<RecoveryCandidate> = RecoveryCandidate::ALL
            .into_iter()
            .filter(|candidate| {
                signature
                    .recover_candidate(&digest, *candidate)
                    .map(|recovered| recovered == private_key.public_key())
                    .unwrap_or(false)
            })
            .collect();

        assert_eq!(matching, vec![signature.candidate()]);
    }

    /// `(r, n - s)` with the opposite y parity, as signed by a client that
    /// does not normalize `s`.
    fn high_s_form(signature: &RecoverableSignature) -> RecoverableSignature {
        let negated: k256::FieldBytes = (-*signature.ecdsa().unwrap().s()).into();
        let mut s = [0u8; 32];
        s.copy_from_slice(&negated);
        RecoverableSignature::new(
            *signature.r(),
            s,
            signature.candidate().with_flipped_y().recovery_id(),
            signature.is_compressed(),
        )
        .unwrap()
    }

    #[test]
    fn high_s_signatures_verify_and_recover() {
        let private_key = key("");
        let digest = sha256(b"data");
        let low = RecoverableSignature::sign(&digest, &private_key, true).unwrap();
        let high = high_s_form(&low);
        assert_ne!(high.s(), low.s());

        assert!(high.verify(&digest, &private_key.public_key()));
        let recovered = high.recover_public_key(&digest).unwrap();
        assert_eq!(recovered, private_key.public_key());
        assert!(high.verify(&digest, &recovered));

        // The un-flipped candidate names the negated point.
        let wrong = RecoverableSignature::new(
            *high.r(),
            *high.s(),
            low.candidate().recovery_id(),
            true,
        )
        .unwrap();
        assert_ne!(
            wrong.recover_public_key(&digest).ok(),
            Some(private_key.public_key())
        );
    }

    #[test]
    fn flipping_y_twice_is_identity() {
        for candidate in RecoveryCandidate::ALL {
            assert_ne!(candidate.with_flipped_y(), candidate);
            assert_eq!(candidate.with_flipped_y().with_flipped_y(), candidate);
            assert_eq!(candidate.with_flipped_y().is_x_reduced(), candidate.is_x_reduced());
        }
    }

    #[test]
    fn reduced_candidates_need_small_r() {
        let large_r = [0xffu8; 32];
        let small_r = [0u8; 32];
        assert!(RecoveryCandidate::EvenY.is_feasible(&large_r));
        assert!(RecoveryCandidate::OddY.is_feasible(&large_r));
        assert!(!RecoveryCandidate::EvenYReducedX.is_feasible(&large_r));
        assert!(!RecoveryCandidate::OddYReducedX.is_feasible(&large_r));
        assert!(RecoveryCandidate::OddYReducedX.is_feasible(&small_r));
    }

    #[test]
    fn infeasible_candidate_is_point_not_on_curve() {
        let digest = sha256(b"data");
        let signed = RecoverableSignature::sign(&digest, &key(""), true).unwrap();
        // A random r is far above p - n, so the reduced-x candidate cannot exist.
        let forged = RecoverableSignature::new(*signed.r(), *signed.s(), 2, true).unwrap();
        assert_eq!(
            forged.recover_public_key(&digest),
            Err(EccError::PointNotOnCurve)
        );
    }

    #[test]
    fn recovery_id_out_of_range_is_rejected() {
        assert_eq!(
            RecoverableSignature::new([1; 32], [1; 32], 4, true),
            Err(EccError::InvalidRecoveryId(4))
        );
    }

    #[test]
    fn wire_format_round_trip() {
        let digest = sha256(b"data");
        for compressed in [true, false] {
            let signature = RecoverableSignature::sign(&digest, &key(""), compressed).unwrap();
            let bytes = signature.to_bytes();
            assert_eq!(
                bytes[0],
                27 + signature.candidate().recovery_id() + if compressed { 4 } else { 0 }
            );
            assert_eq!(RecoverableSignature::from_bytes(&bytes).unwrap(), signature);
        }
    }

    #[test]
    fn wire_format_rejects_bad_header_and_length() {
        let digest = sha256(b"data");
        let mut bytes = RecoverableSignature::sign(&digest, &key(""), true)
            .unwrap()
            .to_bytes();

        assert!(matches!(
            RecoverableSignature::from_bytes(&bytes[..64]),
            Err(EccError::MalformedSignature(_))
        ));

        bytes[0] = 26;
        assert_eq!(
            RecoverableSignature::from_bytes(&bytes),
            Err(EccError::InvalidRecoveryId(26))
        );

        bytes[0] = 35;
        assert_eq!(
            RecoverableSignature::from_bytes(&bytes),
            Err(EccError::InvalidRecoveryId(35))
        );
    }

    #[test]
    fn zero_scalars_do_not_verify_or_recover() {
        let digest = sha256(b"data");
        let signature = RecoverableSignature::new([0; 32], [0; 32], 0, true).unwrap();
        assert!(!signature.verify(&digest, &key("").public_key()));
        assert!(matches!(
            signature.recover_public_key(&digest),
            Err(EccError::MalformedSignature(_))
        ));
    }
}
