// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Ownership of the attestation certificate buffers.

use anyhow::{bail, Result};

/// Maximum length of a DER-encoded attestation certificate.
pub const MAX_CERT_DER_LEN: usize = 600;

/// The role a certificate plays in the attestation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateRole {
    /// Product Attestation Authority, the root of the chain.
    Paa,
    /// Product Attestation Intermediate, signs DACs for a product line.
    Pai,
    /// Device Attestation Certificate, the leaf identifying one device.
    Dac,
}

impl CertificateRole {
    /// Short name used in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paa => "PAA",
            Self::Pai => "PAI",
            Self::Dac => "DAC",
        }
    }
}

/// Owns the three DER certificate buffers for the lifetime of a validation
/// run. The buffers are written once at construction and never mutated;
/// all consumers borrow read-only slices.
pub struct CertificateStore {
    paa: Vec<u8>,
    pai: Vec<u8>,
    dac: Vec<u8>,
}

impl CertificateStore {
    /// Take ownership of the three certificate buffers.
    ///
    /// Each buffer must be non-empty and at most [`MAX_CERT_DER_LEN`] bytes.
    pub fn new(paa: Vec<u8>, pai: Vec<u8>, dac: Vec<u8>) -> Result<Self> {
        for (role, cert) in [
            (CertificateRole::Paa, &paa),
            (CertificateRole::Pai, &pai),
            (CertificateRole::Dac, &dac),
        ] {
            if cert.is_empty() {
                bail!("{} certificate is empty", role.as_str());
            }
            if cert.len() > MAX_CERT_DER_LEN {
                bail!(
                    "{} certificate is {} bytes, max {}",
                    role.as_str(),
                    cert.len(),
                    MAX_CERT_DER_LEN
                );
            }
        }
        Ok(Self { paa, pai, dac })
    }

    /// The PAA certificate in DER form.
    pub fn paa(&self) -> &[u8] {
        &self.paa
    }

    /// The PAI certificate in DER form.
    pub fn pai(&self) -> &[u8] {
        &self.pai
    }

    /// The DAC certificate in DER form.
    pub fn dac(&self) -> &[u8] {
        &self.dac
    }

    /// The certificate for a given role.
    pub fn cert(&self, role: CertificateRole) -> &[u8] {
        match role {
            CertificateRole::Paa => &self.paa,
            CertificateRole::Pai => &self.pai,
            CertificateRole::Dac => &self.dac,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_PAA: &[u8] = include_bytes!("../tests/data/dev-paa.der");
    const DEV_PAI: &[u8] = include_bytes!("../tests/data/dev-pai.der");
    const DEV_DAC: &[u8] = include_bytes!("../tests/data/dev-dac.der");

    #[test]
    fn store_holds_certs() {
        let store =
            CertificateStore::new(DEV_PAA.to_vec(), DEV_PAI.to_vec(), DEV_DAC.to_vec()).unwrap();
        assert_eq!(store.paa(), DEV_PAA);
        assert_eq!(store.pai(), DEV_PAI);
        assert_eq!(store.dac(), DEV_DAC);
        assert_eq!(store.cert(CertificateRole::Dac), DEV_DAC);
    }

    #[test]
    fn store_rejects_empty() {
        let result = CertificateStore::new(Vec::new(), DEV_PAI.to_vec(), DEV_DAC.to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn store_rejects_oversized() {
        let oversized = vec![0u8; MAX_CERT_DER_LEN + 1];
        let result = CertificateStore::new(DEV_PAA.to_vec(), DEV_PAI.to_vec(), oversized);
        assert!(result.is_err());
    }
}
