// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! OIDs used by Matter attestation certificates.

/// OID for the Matter Vendor ID subject DN attribute.
pub const MATTER_DN_VENDOR_ID: &[u64] = &[1, 3, 6, 1, 4, 1, 37244, 2, 1];
/// OID for the Matter Product ID subject DN attribute.
pub const MATTER_DN_PRODUCT_ID: &[u64] = &[1, 3, 6, 1, 4, 1, 37244, 2, 2];
/// OID for the ecdsa-with-SHA256 signature algorithm.
pub const ECDSA_WITH_SHA256: &[u64] = &[1, 2, 840, 10045, 4, 3, 2];
