// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! ECDSA P-256 signing and verification for the attestation challenge.

use core::fmt;

use anyhow::{anyhow, Result};
use ring::rand::SystemRandom;
use ring::signature::{
    EcdsaKeyPair, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA256_ASN1_SIGNING,
};

/// Maximum length of an ASN.1 DER encoded ECDSA P-256 signature.
pub const MAX_SIGNATURE_DER_LEN: usize = 72;

/// Errors from signing and signature handling.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    /// No device attestation key is provisioned.
    #[error("no device attestation key is provisioned")]
    KeyUnavailable,

    /// The underlying signing operation failed.
    #[error("signing with the device attestation key failed")]
    SignatureFailure,

    /// The signature encoding does not fit the fixed-capacity representation.
    #[error("signature encoding of {len} bytes exceeds the fixed capacity")]
    InvalidSignatureEncoding {
        /// Length of the rejected encoding.
        len: usize,
    },
}

/// A fixed-capacity ASN.1 DER ECDSA P-256 signature.
///
/// The length is fixed at construction; byte access is only possible on a
/// fully constructed value.
#[derive(Clone, Copy)]
pub struct DeviceSignature {
    bytes: [u8; MAX_SIGNATURE_DER_LEN],
    len: usize,
}

impl DeviceSignature {
    /// Wrap a DER-encoded signature.
    ///
    /// Fails with [`CryptoError::InvalidSignatureEncoding`] if the encoding
    /// exceeds [`MAX_SIGNATURE_DER_LEN`] bytes.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        if der.len() > MAX_SIGNATURE_DER_LEN {
            return Err(CryptoError::InvalidSignatureEncoding { len: der.len() });
        }
        let mut bytes = [0u8; MAX_SIGNATURE_DER_LEN];
        bytes[..der.len()].copy_from_slice(der);
        Ok(Self {
            bytes,
            len: der.len(),
        })
    }

    /// The DER-encoded signature bytes.
    pub fn as_der(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Debug for DeviceSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceSignature({} bytes)", self.len)
    }
}

/// Capability to sign with the device attestation key.
///
/// The private key stays behind this trait; on real hardware it lives in a
/// secure element, in tests a software P-256 key stands in.
pub trait AttestationSigner {
    /// Produce a signature over `message` with the device attestation key.
    fn sign_with_device_key(&self, message: &[u8]) -> Result<DeviceSignature, CryptoError>;
}

/// Software P-256 signer over a PKCS#8 private key.
pub struct SoftwareAttestationSigner {
    pkcs8: Vec<u8>,
}

impl SoftwareAttestationSigner {
    /// Build a signer from a PKCS#8 DER encoded P-256 private key.
    pub fn from_pkcs8(pkcs8: &[u8]) -> Result<Self> {
        let rng = SystemRandom::new();
        EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, pkcs8, &rng)
            .map_err(|e| anyhow!("not a valid PKCS#8 P-256 signing key: {e}"))?;
        Ok(Self {
            pkcs8: pkcs8.to_vec(),
        })
    }
}

impl AttestationSigner for SoftwareAttestationSigner {
    fn sign_with_device_key(&self, message: &[u8]) -> Result<DeviceSignature, CryptoError> {
        let rng = SystemRandom::new();
        let key_pair = EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &self.pkcs8, &rng)
            .map_err(|_| CryptoError::SignatureFailure)?;
        let signature = key_pair
            .sign(&rng, message)
            .map_err(|_| CryptoError::SignatureFailure)?;
        DeviceSignature::from_der(signature.as_ref())
    }
}

/// Verify an ECDSA P-256/SHA-256 signature over `message`.
///
/// `public_key` is the 65-byte uncompressed SEC1 point. Returns `false` on
/// mismatch; a mismatching signature is an expected outcome, not an error.
pub fn verify_p256_signature(
    message: &[u8],
    signature: &DeviceSignature,
    public_key: &[u8],
) -> bool {
    let key = UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, public_key);
    key.verify(message, signature.as_der()).is_ok()
}
