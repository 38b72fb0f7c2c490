// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The three-stage attestation chain validator.
//!
//! Stage 1 checks each certificate's format against its role, stage 2
//! checks VID/PID consistency across the chain, stage 3 checks the
//! cryptographic chain itself. Any failing stage short-circuits with its
//! result code; the whole validator is a pure function of the three
//! certificate inputs.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use ring::signature::{UnparsedPublicKey, ECDSA_P256_SHA256_ASN1};
use tracing::debug;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;
use x509_parser::x509::X509Version;

use dac_certs::fields::{self, P256_PUBLIC_KEY_LEN};
use dac_certs::oids::ECDSA_WITH_SHA256;
use dac_certs::store::{CertificateRole, MAX_CERT_DER_LEN};

use crate::result::{map_chain_result, AttestationVerificationResult, ChainValidationResult};

/// Validate a full PAA/PAI/DAC attestation chain.
///
/// Runs the format, VID/PID consistency and cryptographic chain stages in
/// order, returning the first failing stage's result code, or
/// [`AttestationVerificationResult::Success`] when all three pass.
pub fn verify_attestation_chain(
    paa: &[u8],
    pai: &[u8],
    dac: &[u8],
) -> AttestationVerificationResult {
    use AttestationVerificationResult as A;

    let roles = [
        (CertificateRole::Paa, paa, A::PaaArgumentInvalid, A::PaaFormatInvalid),
        (CertificateRole::Pai, pai, A::PaiArgumentInvalid, A::PaiFormatInvalid),
        (CertificateRole::Dac, dac, A::DacArgumentInvalid, A::DacFormatInvalid),
    ];
    for (role, cert, argument_invalid, format_invalid) in roles {
        if cert.is_empty() || cert.len() > MAX_CERT_DER_LEN {
            debug!("{} certificate has invalid length {}", role.as_str(), cert.len());
            return argument_invalid;
        }
        if let Err(err) = verify_certificate_format(cert, role) {
            debug!("{} format check failed: {err:#}", role.as_str());
            return format_invalid;
        }
    }
    debug!("format stage passed for all three certificates");

    let consistency = validate_vid_pid_consistency(paa, pai, dac);
    if !consistency.is_success() {
        debug!("VID/PID consistency stage failed: {consistency}");
        return consistency;
    }
    debug!("VID/PID consistency stage passed");

    let chain = validate_certificate_chain(paa, pai, dac);
    let mapped = map_chain_result(chain);
    debug!("cryptographic chain stage: {chain} -> {mapped}");
    mapped
}

/// Check a certificate's format against the requirements of its role.
///
/// All three roles must be DER X.509 v3, signed with ecdsa-with-SHA256 and
/// carry an uncompressed P-256 subject public key. PAA and PAI are CAs
/// with `keyCertSign`; the DAC is an end-entity certificate with
/// `digitalSignature`. VID/PID presence rules: the DAC carries both, the
/// PAI carries a VID (PID optional), the PAA carries no PID and must be
/// self-issued.
pub fn verify_certificate_format(cert_der: &[u8], role: CertificateRole) -> Result<()> {
    let cert = fields::parse_certificate(cert_der)?;

    if cert.version() != X509Version::V3 {
        bail!("certificate is not X.509 v3");
    }

    let sig_alg: Vec<u64> = cert
        .signature_algorithm
        .algorithm
        .iter()
        .context("invalid signature algorithm oid")?
        .collect();
    if sig_alg.as_slice() != ECDSA_WITH_SHA256 {
        bail!("signature algorithm is not ecdsa-with-SHA256");
    }

    let spki = cert.public_key();
    let parsed = spki
        .parsed()
        .context("failed to decode subject public key")?;
    let PublicKey::EC(point) = parsed else {
        bail!("subject public key is not an EC key");
    };
    if point.data().len() != P256_PUBLIC_KEY_LEN {
        bail!("subject public key is not an uncompressed P-256 point");
    }

    let is_ca = matches!(role, CertificateRole::Paa | CertificateRole::Pai);
    let bc = cert
        .basic_constraints()
        .ok()
        .flatten()
        .context("missing BasicConstraints extension")?;
    if bc.value.ca != is_ca {
        bail!(
            "BasicConstraints cA is {}, expected {} for a {}",
            bc.value.ca,
            is_ca,
            role.as_str()
        );
    }

    let ku = cert
        .key_usage()
        .ok()
        .flatten()
        .context("missing KeyUsage extension")?;
    if is_ca {
        if !ku.value.key_cert_sign() {
            bail!("{} KeyUsage lacks keyCertSign", role.as_str());
        }
    } else if !ku.value.digital_signature() {
        bail!("DAC KeyUsage lacks digitalSignature");
    }

    let vid_pid = fields::extract_vid_pid(cert_der)?;
    match role {
        CertificateRole::Dac => {
            if vid_pid.vid.is_none() {
                bail!("DAC has no vendor id");
            }
            if vid_pid.pid.is_none() {
                bail!("DAC has no product id");
            }
        }
        CertificateRole::Pai => {
            if vid_pid.vid.is_none() {
                bail!("PAI has no vendor id");
            }
        }
        CertificateRole::Paa => {
            if vid_pid.pid.is_some() {
                bail!("PAA must not declare a product id");
            }
            if cert.subject().as_raw() != cert.issuer().as_raw() {
                bail!("PAA is not self-issued");
            }
        }
    }

    Ok(())
}

/// Check VID/PID consistency across the three certificates.
///
/// The DAC's vendor id is the chain's reference vendor id. Missing VID/PID
/// on the PAI or PAA are treated as unspecified and not compared.
pub fn validate_vid_pid_consistency(
    paa: &[u8],
    pai: &[u8],
    dac: &[u8],
) -> AttestationVerificationResult {
    use AttestationVerificationResult as A;

    let Ok(dac_vp) = fields::extract_vid_pid(dac) else {
        return A::DacFormatInvalid;
    };
    let Ok(pai_vp) = fields::extract_vid_pid(pai) else {
        return A::PaiFormatInvalid;
    };
    let Ok(paa_vp) = fields::extract_vid_pid(paa) else {
        return A::PaaFormatInvalid;
    };

    let Some(dac_vid) = dac_vp.vid else {
        return A::DacVendorIdMismatch;
    };
    if let Some(pai_vid) = pai_vp.vid {
        if pai_vid != dac_vid {
            return A::DacVendorIdMismatch;
        }
    }

    // A PAA/DAC vendor id mismatch reports the PAI code. This mirrors the
    // established mapping; downstream tooling matches on the exact code.
    if let Some(paa_vid) = paa_vp.vid {
        if paa_vid != dac_vid {
            return A::PaiVendorIdMismatch;
        }
    }

    if let Some(pai_pid) = pai_vp.pid {
        if dac_vp.pid != Some(pai_pid) {
            return A::DacProductIdMismatch;
        }
    }

    if paa_vp.pid.is_some() {
        return A::PaaFormatInvalid;
    }

    A::Success
}

/// Validate the cryptographic certificate chain.
///
/// Checks issuer/subject linkage, AKID/SKID linkage where present,
/// validity windows, and that the DAC is signed by the PAI's key, the PAI
/// by the PAA's key and the PAA by itself.
pub fn validate_certificate_chain(paa: &[u8], pai: &[u8], dac: &[u8]) -> ChainValidationResult {
    use ChainValidationResult as C;

    let slots = [
        (paa, C::RootArgumentInvalid),
        (pai, C::IcaArgumentInvalid),
        (dac, C::LeafArgumentInvalid),
    ];
    for (cert, argument_invalid) in slots {
        if cert.is_empty() || cert.len() > MAX_CERT_DER_LEN {
            return argument_invalid;
        }
    }

    let Ok(paa_cert) = fields::parse_certificate(paa) else {
        return C::RootFormatInvalid;
    };
    let Ok(pai_cert) = fields::parse_certificate(pai) else {
        return C::IcaFormatInvalid;
    };
    let Ok(dac_cert) = fields::parse_certificate(dac) else {
        return C::LeafFormatInvalid;
    };

    match validate_chain_links(&paa_cert, &pai_cert, &dac_cert) {
        Ok(()) => C::Valid,
        Err(err) => {
            debug!("chain validation failed: {err:#}");
            C::ChainInvalid
        }
    }
}

fn validate_chain_links(
    paa: &X509Certificate<'_>,
    pai: &X509Certificate<'_>,
    dac: &X509Certificate<'_>,
) -> Result<()> {
    verify_link(dac, pai, "DAC")?;
    verify_link(pai, paa, "PAI")?;
    // The root closes the chain on itself.
    verify_link(paa, paa, "PAA")?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("failed to get current time")?
        .as_secs() as i64;
    for (name, cert) in [("PAA", paa), ("PAI", pai), ("DAC", dac)] {
        let validity = cert.validity();
        if now < validity.not_before.timestamp() || now > validity.not_after.timestamp() {
            bail!("{name} certificate is outside its validity window");
        }
    }

    Ok(())
}

fn verify_link(
    subject: &X509Certificate<'_>,
    issuer: &X509Certificate<'_>,
    name: &str,
) -> Result<()> {
    if subject.issuer().as_raw() != issuer.subject().as_raw() {
        bail!("{name} issuer does not match the issuing certificate's subject");
    }

    if let (Some(akid), Some(skid)) = (authority_key_id(subject), subject_key_id(issuer)) {
        if akid != skid {
            bail!("{name} AKID does not match the issuing certificate's SKID");
        }
    }

    let issuer_key = match issuer
        .public_key()
        .parsed()
        .context("failed to decode issuer public key")?
    {
        PublicKey::EC(point) => point.data().to_vec(),
        _ => bail!("issuer public key is not an EC key"),
    };
    let key = UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, &issuer_key);
    key.verify(
        subject.tbs_certificate.as_ref(),
        subject.signature_value.data.as_ref(),
    )
    .ok()
    .with_context(|| format!("{name} signature does not verify against the issuer's key"))?;

    Ok(())
}

fn authority_key_id<'a>(cert: &X509Certificate<'a>) -> Option<&'a [u8]> {
    cert.extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::AuthorityKeyIdentifier(aki) => {
                aki.key_identifier.as_ref().map(|k| k.0)
            }
            _ => None,
        })
}

fn subject_key_id<'a>(cert: &X509Certificate<'a>) -> Option<&'a [u8]> {
    cert.extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::SubjectKeyIdentifier(key_id) => Some(key_id.0),
            _ => None,
        })
}
