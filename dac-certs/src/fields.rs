// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Extraction of attestation-relevant fields from DER certificates.
//!
//! Matter encodes the Vendor ID and Product ID as subject DN attributes
//! holding 4-character hex strings; the public key is the uncompressed
//! P-256 point from the SubjectPublicKeyInfo; AKID and SKID are the
//! standard X.509v3 key-identifier extensions.

use anyhow::{anyhow, bail, Context, Result};
use x509_parser::der_parser::Oid;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

use crate::oids::{MATTER_DN_PRODUCT_ID, MATTER_DN_VENDOR_ID};

/// Length of an uncompressed P-256 public key (0x04 || X || Y).
pub const P256_PUBLIC_KEY_LEN: usize = 65;

/// Vendor ID and Product ID extracted from a certificate.
///
/// Either field may be absent; presence requirements depend on the
/// certificate's role and are enforced by the chain validator, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VidPid {
    /// Matter Vendor ID, if the certificate declares one.
    pub vid: Option<u16>,
    /// Matter Product ID, if the certificate declares one.
    pub pid: Option<u16>,
}

/// Parse a DER certificate, rejecting trailing bytes after the outer
/// SEQUENCE.
pub fn parse_certificate(der: &[u8]) -> Result<X509Certificate<'_>> {
    let (rem, cert) = X509Certificate::from_der(der).context("failed to parse certificate")?;
    if !rem.is_empty() {
        bail!("{} trailing bytes after certificate", rem.len());
    }
    Ok(cert)
}

/// Extract the Matter Vendor ID and Product ID from the subject DN.
///
/// Both attributes are optional. A present attribute that is not a
/// 4-character hex string is an error.
pub fn extract_vid_pid(cert_der: &[u8]) -> Result<VidPid> {
    let cert = parse_certificate(cert_der)?;
    Ok(VidPid {
        vid: subject_u16_attr(&cert, MATTER_DN_VENDOR_ID).context("bad vendor id attribute")?,
        pid: subject_u16_attr(&cert, MATTER_DN_PRODUCT_ID).context("bad product id attribute")?,
    })
}

/// Extract the uncompressed P-256 public key from the SubjectPublicKeyInfo.
pub fn extract_public_key(cert_der: &[u8]) -> Result<[u8; P256_PUBLIC_KEY_LEN]> {
    let cert = parse_certificate(cert_der)?;
    let spki = cert.public_key();
    let parsed = spki
        .parsed()
        .context("failed to decode subject public key")?;
    let PublicKey::EC(point) = parsed else {
        bail!("subject public key is not an EC key");
    };
    let data = point.data();
    if data.len() != P256_PUBLIC_KEY_LEN || data[0] != 0x04 {
        bail!(
            "subject public key is not an uncompressed P-256 point ({} bytes)",
            data.len()
        );
    }
    let mut key = [0u8; P256_PUBLIC_KEY_LEN];
    key.copy_from_slice(data);
    Ok(key)
}

/// Extract the Authority Key Identifier.
///
/// Absence of the extension is an error; callers that tolerate a missing
/// AKID (PAA certificates may omit it) handle that at the call site.
pub fn extract_authority_key_id(cert_der: &[u8]) -> Result<&[u8]> {
    let cert = parse_certificate(cert_der)?;
    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityKeyIdentifier(aki) = ext.parsed_extension() {
            let key_id = aki
                .key_identifier
                .as_ref()
                .context("AKID extension has no key identifier")?;
            return Ok(key_id.0);
        }
    }
    bail!("certificate has no authority key identifier");
}

/// Extract the Subject Key Identifier.
pub fn extract_subject_key_id(cert_der: &[u8]) -> Result<&[u8]> {
    let cert = parse_certificate(cert_der)?;
    for ext in cert.extensions() {
        if let ParsedExtension::SubjectKeyIdentifier(key_id) = ext.parsed_extension() {
            return Ok(key_id.0);
        }
    }
    bail!("certificate has no subject key identifier");
}

fn subject_u16_attr(cert: &X509Certificate<'_>, oid: &[u64]) -> Result<Option<u16>> {
    let oid = Oid::from(oid).map_err(|_| anyhow!("invalid oid"))?;
    let Some(attr) = cert.subject().iter_by_oid(&oid).next() else {
        return Ok(None);
    };
    let text = attr.as_str().context("attribute value is not a string")?;
    if text.len() != 4 {
        bail!("expected 4 hex characters, got {:?}", text);
    }
    let value = u16::from_str_radix(text, 16)
        .with_context(|| format!("attribute value {text:?} is not hex"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_PAA: &[u8] = include_bytes!("../tests/data/dev-paa.der");
    const DEV_PAI: &[u8] = include_bytes!("../tests/data/dev-pai.der");
    const DEV_DAC: &[u8] = include_bytes!("../tests/data/dev-dac.der");

    #[test]
    fn dac_vid_pid() {
        let vid_pid = extract_vid_pid(DEV_DAC).unwrap();
        assert_eq!(vid_pid.vid, Some(0xFFF1));
        assert_eq!(vid_pid.pid, Some(0x8000));
    }

    #[test]
    fn pai_has_vid_but_no_pid() {
        let vid_pid = extract_vid_pid(DEV_PAI).unwrap();
        assert_eq!(vid_pid.vid, Some(0xFFF1));
        assert_eq!(vid_pid.pid, None);
    }

    #[test]
    fn paa_has_neither_vid_nor_pid() {
        let vid_pid = extract_vid_pid(DEV_PAA).unwrap();
        assert_eq!(vid_pid, VidPid::default());
    }

    #[test]
    fn dac_public_key_is_uncompressed_point() {
        let key = extract_public_key(DEV_DAC).unwrap();
        assert_eq!(key[0], 0x04);
        assert_eq!(
            hex::encode(&key[1..9]),
            // leading bytes of the known development DAC public key
            "62db16badea326a6"
        );
    }

    #[test]
    fn dac_akid_matches_pai_skid() {
        let akid = extract_authority_key_id(DEV_DAC).unwrap();
        let skid = extract_subject_key_id(DEV_PAI).unwrap();
        assert_eq!(akid, skid);
    }

    #[test]
    fn paa_is_self_signed_akid_equals_skid() {
        let akid = extract_authority_key_id(DEV_PAA).unwrap();
        let skid = extract_subject_key_id(DEV_PAA).unwrap();
        assert_eq!(akid, skid);
        assert_eq!(
            hex::encode(skid),
            "fa92cf095efa42e11430651632fefe1b2c77a7c8"
        );
    }

    #[test]
    fn pai_skid_known_value() {
        let skid = extract_subject_key_id(DEV_PAI).unwrap();
        assert_eq!(
            hex::encode(skid),
            "63540e47f64b1c38d13884a462d16c195d8ffb3c"
        );
    }

    #[test]
    fn garbage_input_is_rejected() {
        assert!(extract_vid_pid(&[0xDE, 0xAD, 0xBE, 0xEF]).is_err());
        assert!(extract_public_key(&[]).is_err());
        assert!(extract_subject_key_id(&[0x30, 0x00]).is_err());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut padded = DEV_DAC.to_vec();
        padded.push(0x00);
        assert!(parse_certificate(&padded).is_err());
    }
}
