// SPDX-FileCopyrightText: © 2026 The Project Contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Manufacturing test for Matter device attestation credentials.
//!
//! Loads the PAA/PAI/DAC certificates, dumps the attestation fields, proves
//! possession of the DAC private key via a challenge round-trip, and
//! validates the attestation chain. A device that fails any step cannot
//! prove its identity and must not be shipped as attested.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use fs_err as fs;
use serde::Serialize;
use tracing::{error, info, warn};

use dac_certs::crypto::{verify_p256_signature, CryptoError, SoftwareAttestationSigner};
use dac_certs::fields;
use dac_certs::store::{CertificateRole, CertificateStore};
use dac_certs::traits::{CredentialsProvider, StoredCredentials};
use dac_verifier::verify_attestation_chain;

/// The development PAA compiled into the binary. Used when no PAA file is
/// given, mirroring production builds where the trusted root ships as an
/// asset.
const BUILTIN_PAA: &[u8] = include_bytes!("../assets/dev-paa.der");

/// Matter device attestation manufacturing test
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the attestation fields of a DER certificate
    Show(ShowArgs),
    /// Verify the device attestation chain and key
    Verify(VerifyArgs),
}

#[derive(Parser)]
struct ShowArgs {
    /// Certificate file in DER format
    cert: PathBuf,
}

#[derive(Parser)]
struct VerifyArgs {
    /// PAA certificate in DER format; defaults to the built-in development PAA
    #[arg(long)]
    paa: Option<PathBuf>,

    /// PAI certificate in DER format
    #[arg(long)]
    pai: PathBuf,

    /// DAC certificate in DER format
    #[arg(long)]
    dac: PathBuf,

    /// DAC private key (PKCS#8, DER or PEM); the challenge round-trip is
    /// skipped when absent
    #[arg(long)]
    dac_key: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Attestation fields of one certificate, hex encoded for display.
#[derive(Serialize)]
struct CertReport {
    role: &'static str,
    vendor_id: Option<u16>,
    product_id: Option<u16>,
    public_key: String,
    subject_key_id: String,
    authority_key_id: Option<String>,
}

/// Full manufacturing-test report.
#[derive(Serialize)]
struct VerifyReport {
    certificates: Vec<CertReport>,
    challenge_round_trip: Option<bool>,
    attestation_result: String,
    attested: bool,
}

fn main() -> ExitCode {
    {
        use tracing_subscriber::{fmt, EnvFilter};
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).init();
    }
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Show(args) => cmd_show(args).map(|()| true),
        Commands::Verify(args) => cmd_verify(args),
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_show(args: ShowArgs) -> Result<()> {
    let cert = fs::read(&args.cert)?;
    let report = cert_report("certificate", &cert)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_verify(args: VerifyArgs) -> Result<bool> {
    let paa = match &args.paa {
        Some(path) => fs::read(path)?,
        None => {
            info!("no PAA given, using the built-in development PAA");
            BUILTIN_PAA.to_vec()
        }
    };
    let pai = fs::read(&args.pai)?;
    let dac = fs::read(&args.dac)?;

    let signer = args
        .dac_key
        .as_deref()
        .map(load_signer)
        .transpose()
        .context("failed to load DAC private key")?;
    let credentials = StoredCredentials::new(dac.clone(), pai.clone(), signer)?;
    let store = CertificateStore::new(paa, pai, dac)?;

    let mut certificates = Vec::new();
    for role in [
        CertificateRole::Paa,
        CertificateRole::Pai,
        CertificateRole::Dac,
    ] {
        let report = cert_report(role.as_str(), store.cert(role))
            .with_context(|| format!("failed to read {} fields", role.as_str()))?;
        info!(
            "{}: vid={} pid={} skid={} akid={}",
            report.role,
            report
                .vendor_id
                .map_or("-".to_string(), |v| format!("{v:04X}")),
            report
                .product_id
                .map_or("-".to_string(), |p| format!("{p:04X}")),
            report.subject_key_id,
            report.authority_key_id.as_deref().unwrap_or("-"),
        );
        certificates.push(report);
    }

    let round_trip = challenge_round_trip(&credentials, store.dac())?;
    match round_trip {
        Some(true) => info!("challenge round-trip passed"),
        Some(false) => error!("challenge round-trip FAILED"),
        None => {}
    }

    let result = verify_attestation_chain(store.paa(), store.pai(), store.dac());
    let attested = result.is_success() && round_trip != Some(false);
    if result.is_success() {
        info!("attestation chain valid");
    } else {
        error!("attestation chain validation failed: {result}");
    }

    if args.json {
        let report = VerifyReport {
            certificates,
            challenge_round_trip: round_trip,
            attestation_result: result.to_string(),
            attested,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(attested)
}

/// Sign a fresh random challenge with the device attestation key and verify
/// it against the DAC public key. Returns `None` when no key is
/// provisioned.
fn challenge_round_trip(
    credentials: &impl CredentialsProvider,
    dac: &[u8],
) -> Result<Option<bool>> {
    let mut challenge = [0u8; 32];
    getrandom::fill(&mut challenge).map_err(|e| anyhow!("failed to get random bytes: {e}"))?;

    let signature = match credentials.sign_with_device_attestation_key(&challenge) {
        Ok(signature) => signature,
        Err(CryptoError::KeyUnavailable) => {
            warn!("no DAC private key provisioned, skipping challenge round-trip");
            return Ok(None);
        }
        Err(err) => return Err(err).context("failed to sign challenge"),
    };

    let public_key = fields::extract_public_key(dac).context("failed to extract DAC public key")?;
    Ok(Some(verify_p256_signature(
        &challenge,
        &signature,
        &public_key,
    )))
}

fn cert_report(role: &'static str, cert: &[u8]) -> Result<CertReport> {
    let vid_pid = fields::extract_vid_pid(cert)?;
    let public_key = fields::extract_public_key(cert)?;
    let subject_key_id = fields::extract_subject_key_id(cert)?;
    // PAA certificates are permitted to omit the AKID; report it as absent
    // rather than failing the dump.
    let authority_key_id = fields::extract_authority_key_id(cert).ok();

    Ok(CertReport {
        role,
        vendor_id: vid_pid.vid,
        product_id: vid_pid.pid,
        public_key: hex::encode(public_key),
        subject_key_id: hex::encode(subject_key_id),
        authority_key_id: authority_key_id.map(hex::encode),
    })
}

fn load_signer(path: &Path) -> Result<SoftwareAttestationSigner> {
    let bytes = fs::read(path)?;
    let pkcs8 = if bytes.starts_with(b"-----") {
        let pem = String::from_utf8(bytes).context("key file is not valid UTF-8")?;
        rcgen::KeyPair::from_pem(&pem)
            .context("failed to parse PEM key")?
            .serialize_der()
    } else {
        bytes
    };
    SoftwareAttestationSigner::from_pkcs8(&pkcs8)
}
