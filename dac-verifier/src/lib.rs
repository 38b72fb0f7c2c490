// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Matter device attestation chain validation.
//!
//! Validates a PAA/PAI/DAC certificate chain in three fail-fast stages:
//! per-role format checks, VID/PID consistency, then the cryptographic
//! chain, and maps low-level chain results to the attestation result
//! taxonomy.
#![deny(missing_docs)]

pub mod result;
pub mod verification;

pub use result::{map_chain_result, AttestationVerificationResult, ChainValidationResult};
pub use verification::{
    validate_certificate_chain, validate_vid_pid_consistency, verify_attestation_chain,
    verify_certificate_format,
};
