// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Result codes for chain validation and attestation verification.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the low-level certificate chain validation.
///
/// Root/Ica/Leaf correspond to the PAA/PAI/DAC positions in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainValidationResult {
    /// The chain is valid.
    Valid,
    /// The root certificate cannot be parsed.
    RootFormatInvalid,
    /// The root certificate buffer is empty or oversized.
    RootArgumentInvalid,
    /// The intermediate certificate cannot be parsed.
    IcaFormatInvalid,
    /// The intermediate certificate buffer is empty or oversized.
    IcaArgumentInvalid,
    /// The leaf certificate cannot be parsed.
    LeafFormatInvalid,
    /// The leaf certificate buffer is empty or oversized.
    LeafArgumentInvalid,
    /// A linkage, validity or signature check failed.
    ChainInvalid,
    /// Out of memory.
    NoMemory,
    /// Unexpected internal failure.
    InternalError,
}

/// Outcome of the attestation verification flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationVerificationResult {
    /// The device presented a valid attestation chain.
    Success,
    /// The PAA certificate fails the format checks for its role.
    PaaFormatInvalid,
    /// The PAA certificate buffer is empty or oversized.
    PaaArgumentInvalid,
    /// The PAI certificate fails the format checks for its role.
    PaiFormatInvalid,
    /// The PAI certificate buffer is empty or oversized.
    PaiArgumentInvalid,
    /// The DAC fails the format checks for its role.
    DacFormatInvalid,
    /// The DAC buffer is empty or oversized.
    DacArgumentInvalid,
    /// The DAC vendor id is missing or does not match the PAI's.
    DacVendorIdMismatch,
    /// A PAA-declared vendor id does not match the DAC's.
    PaiVendorIdMismatch,
    /// A PAI-declared product id does not match the DAC's.
    DacProductIdMismatch,
    /// A certificate signature does not verify against its issuer's key.
    DacSignatureInvalid,
    /// Out of memory.
    NoMemory,
    /// Unexpected internal failure.
    InternalError,
}

impl AttestationVerificationResult {
    /// Whether the verification passed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ChainValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Valid => "chain valid",
            Self::RootFormatInvalid => "root certificate format invalid",
            Self::RootArgumentInvalid => "root certificate argument invalid",
            Self::IcaFormatInvalid => "intermediate certificate format invalid",
            Self::IcaArgumentInvalid => "intermediate certificate argument invalid",
            Self::LeafFormatInvalid => "leaf certificate format invalid",
            Self::LeafArgumentInvalid => "leaf certificate argument invalid",
            Self::ChainInvalid => "certificate chain invalid",
            Self::NoMemory => "out of memory",
            Self::InternalError => "internal error",
        };
        f.write_str(text)
    }
}

impl fmt::Display for AttestationVerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "attestation verified",
            Self::PaaFormatInvalid => "PAA format invalid",
            Self::PaaArgumentInvalid => "PAA argument invalid",
            Self::PaiFormatInvalid => "PAI format invalid",
            Self::PaiArgumentInvalid => "PAI argument invalid",
            Self::DacFormatInvalid => "DAC format invalid",
            Self::DacArgumentInvalid => "DAC argument invalid",
            Self::DacVendorIdMismatch => "DAC vendor id mismatch",
            Self::PaiVendorIdMismatch => "PAI vendor id mismatch",
            Self::DacProductIdMismatch => "DAC product id mismatch",
            Self::DacSignatureInvalid => "DAC signature invalid",
            Self::NoMemory => "out of memory",
            Self::InternalError => "internal error",
        };
        f.write_str(text)
    }
}

/// Map a low-level chain validation result to the attestation taxonomy.
///
/// Total function: every chain result maps to exactly one attestation
/// result, anything unexpected collapses to `InternalError`.
pub fn map_chain_result(result: ChainValidationResult) -> AttestationVerificationResult {
    use AttestationVerificationResult as A;
    use ChainValidationResult as C;

    match result {
        C::Valid => A::Success,
        C::RootFormatInvalid => A::PaaFormatInvalid,
        C::RootArgumentInvalid => A::PaaArgumentInvalid,
        C::IcaFormatInvalid => A::PaiFormatInvalid,
        C::IcaArgumentInvalid => A::PaiArgumentInvalid,
        C::LeafFormatInvalid => A::DacFormatInvalid,
        C::LeafArgumentInvalid => A::DacArgumentInvalid,
        C::ChainInvalid => A::DacSignatureInvalid,
        C::NoMemory => A::NoMemory,
        C::InternalError => A::InternalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttestationVerificationResult as A;
    use ChainValidationResult as C;

    #[test]
    fn mapping_is_total_and_exact() {
        let table = [
            (C::Valid, A::Success),
            (C::RootFormatInvalid, A::PaaFormatInvalid),
            (C::RootArgumentInvalid, A::PaaArgumentInvalid),
            (C::IcaFormatInvalid, A::PaiFormatInvalid),
            (C::IcaArgumentInvalid, A::PaiArgumentInvalid),
            (C::LeafFormatInvalid, A::DacFormatInvalid),
            (C::LeafArgumentInvalid, A::DacArgumentInvalid),
            (C::ChainInvalid, A::DacSignatureInvalid),
            (C::NoMemory, A::NoMemory),
            (C::InternalError, A::InternalError),
        ];
        for (input, expected) in table {
            assert_eq!(map_chain_result(input), expected);
        }
    }

    #[test]
    fn success_predicate() {
        assert!(A::Success.is_success());
        assert!(!A::DacSignatureInvalid.is_success());
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(A::DacVendorIdMismatch.to_string(), "DAC vendor id mismatch");
        assert_eq!(C::ChainInvalid.to_string(), "certificate chain invalid");
    }
}
