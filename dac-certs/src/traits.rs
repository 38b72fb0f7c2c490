// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The device attestation credentials boundary.

use anyhow::{bail, Result};

use crate::crypto::{AttestationSigner, CryptoError, DeviceSignature, SoftwareAttestationSigner};
use crate::store::MAX_CERT_DER_LEN;

/// Source of the device attestation credentials.
///
/// On a real device this is backed by a secure element or a secure-cert
/// partition; the DAC private key never crosses this boundary, only a
/// signing capability does.
pub trait CredentialsProvider {
    /// The DER-encoded Device Attestation Certificate.
    fn device_attestation_cert(&self) -> Result<&[u8]>;

    /// The DER-encoded Product Attestation Intermediate certificate.
    fn product_attestation_intermediate_cert(&self) -> Result<&[u8]>;

    /// Sign `message` with the device attestation key.
    ///
    /// Fails with [`CryptoError::KeyUnavailable`] when no key is
    /// provisioned.
    fn sign_with_device_attestation_key(
        &self,
        message: &[u8],
    ) -> Result<DeviceSignature, CryptoError>;
}

/// In-memory credentials, optionally provisioned with a software signing
/// key. Stands in for the secure element in the manufacturing-test flow
/// and in unit tests.
pub struct StoredCredentials {
    dac: Vec<u8>,
    pai: Vec<u8>,
    signer: Option<SoftwareAttestationSigner>,
}

impl StoredCredentials {
    /// Build credentials from DER certificates and an optional signer.
    pub fn new(
        dac: Vec<u8>,
        pai: Vec<u8>,
        signer: Option<SoftwareAttestationSigner>,
    ) -> Result<Self> {
        for (name, cert) in [("DAC", &dac), ("PAI", &pai)] {
            if cert.is_empty() || cert.len() > MAX_CERT_DER_LEN {
                bail!("{name} certificate has invalid length {}", cert.len());
            }
        }
        Ok(Self { dac, pai, signer })
    }
}

impl CredentialsProvider for StoredCredentials {
    fn device_attestation_cert(&self) -> Result<&[u8]> {
        Ok(&self.dac)
    }

    fn product_attestation_intermediate_cert(&self) -> Result<&[u8]> {
        Ok(&self.pai)
    }

    fn sign_with_device_attestation_key(
        &self,
        message: &[u8],
    ) -> Result<DeviceSignature, CryptoError> {
        let signer = self.signer.as_ref().ok_or(CryptoError::KeyUnavailable)?;
        signer.sign_with_device_key(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_p256_signature;
    use rcgen::{KeyPair, PKCS_ECDSA_P256_SHA256};

    const DEV_PAI: &[u8] = include_bytes!("../tests/data/dev-pai.der");
    const DEV_DAC: &[u8] = include_bytes!("../tests/data/dev-dac.der");

    #[test]
    fn unprovisioned_key_reports_unavailable() {
        let creds = StoredCredentials::new(DEV_DAC.to_vec(), DEV_PAI.to_vec(), None).unwrap();
        assert_eq!(creds.device_attestation_cert().unwrap(), DEV_DAC);
        assert_eq!(creds.product_attestation_intermediate_cert().unwrap(), DEV_PAI);
        assert!(matches!(
            creds.sign_with_device_attestation_key(b"challenge"),
            Err(CryptoError::KeyUnavailable)
        ));
    }

    #[test]
    fn provisioned_key_signs() {
        let key = KeyPair::generate_for(&PKCS_ECDSA_P256_SHA256).unwrap();
        let signer = SoftwareAttestationSigner::from_pkcs8(&key.serialize_der()).unwrap();
        let creds =
            StoredCredentials::new(DEV_DAC.to_vec(), DEV_PAI.to_vec(), Some(signer)).unwrap();

        let signature = creds.sign_with_device_attestation_key(b"challenge").unwrap();
        assert!(verify_p256_signature(
            b"challenge",
            &signature,
            key.public_key_raw()
        ));
    }

    #[test]
    fn empty_cert_is_rejected() {
        assert!(StoredCredentials::new(Vec::new(), DEV_PAI.to_vec(), None).is_err());
    }
}
