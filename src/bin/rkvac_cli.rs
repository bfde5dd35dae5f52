//! Reference CLI: runs one full RKVAC session end-to-end (issuance
//! through verification) and reports success/failure the way the
//! original smartcard-demo CLI did (spec.md §6): exit `0` and a single
//! `OK!` line on success, exit `1` with a message on stderr otherwise.

use anyhow::Context;
use ark_ff::UniformRand;
use ark_std::rand::rngs::OsRng;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rkvac_protocol::config::USER_MAX_NUM_ATTRIBUTES;
use rkvac_protocol::curve::{g1_to_hex, Fr};
use rkvac_protocol::issuer::{ie_issue, ie_setup, UserAttributes};
use rkvac_protocol::ra::{ra_mac, ra_setup};
use rkvac_protocol::system::sys_setup;
use rkvac_protocol::user::{apply_disclosure_policy, disclosed_for_verifier, ue_compute_proof_of_knowledge};
use rkvac_protocol::verifier::{ve_generate_nonce_epoch, ve_verify_proof_of_knowledge, EmptyRevocationList};
use rkvac_protocol::RkvacError;

const LOG_TARGET: &str = "rkvac_protocol::cli";

/// Run a single-session RKVAC demo: issue a credential over `-a`
/// attributes and verify a proof disclosing `-d` of them.
#[derive(Parser, Debug)]
#[command(name = "rkvac_cli", version, about)]
struct Args {
    /// Number of attributes to certify, in [1, MAX_ATTRS].
    #[arg(short = 'a', long = "attributes")]
    attributes: usize,

    /// Number of attributes to disclose, in [0, attributes].
    #[arg(short = 'd', long = "disclosed-attributes")]
    disclosed_attributes: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rkvac_protocol=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => {
            println!("OK!");
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.attributes == 0 || args.attributes > USER_MAX_NUM_ATTRIBUTES {
        return Err(RkvacError::ConfigInvalid(format!(
            "attributes must be in [1, {USER_MAX_NUM_ATTRIBUTES}], got {}",
            args.attributes
        ))
        .into());
    }
    if args.disclosed_attributes > args.attributes {
        return Err(RkvacError::ConfigInvalid(format!(
            "disclosed-attributes ({}) cannot exceed attributes ({})",
            args.disclosed_attributes, args.attributes
        ))
        .into());
    }

    let mut rng = OsRng;
    let id = b"rkvac-cli-session".to_vec();

    tracing::info!(target: LOG_TARGET, attributes = args.attributes, disclosed = args.disclosed_attributes, "starting session");

    let sys = sys_setup().context("curve setup failed")?;
    let (ra_params, ra_keys) = ra_setup(&sys, &mut rng).context("revocation authority setup failed")?;
    let ra_sig = ra_mac(ra_keys.sk, &id, &mut rng).context("revocation authority MAC failed")?;

    let ie_keys = ie_setup(args.attributes, &mut rng).context("issuer key generation failed")?;
    let attribute_values: Vec<Fr> = (0..args.attributes).map(|_| Fr::rand(&mut rng)).collect();
    let attrs = UserAttributes {
        values: attribute_values.clone(),
    };
    let ie_sig = ie_issue(&sys, &ie_keys, &id, &attrs, ra_keys.pk, &ra_sig).context("issuance failed")?;

    let (nonce, epoch) = ve_generate_nonce_epoch(&mut rng)?;

    let disclosure = apply_disclosure_policy(&attribute_values, args.disclosed_attributes)?;
    let (cred, pi) = ue_compute_proof_of_knowledge(
        &ra_params,
        &ra_sig,
        &ie_sig,
        &disclosure,
        nonce.as_bytes(),
        &epoch,
        &mut rng,
    )
    .context("failed to compute proof of knowledge")?;
    tracing::debug!(target: LOG_TARGET, pseudonym = %g1_to_hex(&cred.c), "derived revocation pseudonym");

    let disclosed = disclosed_for_verifier(&disclosure);
    ve_verify_proof_of_knowledge(
        &sys,
        &ra_params,
        ra_keys.pk,
        &ie_keys,
        args.attributes,
        &disclosed,
        &nonce,
        &epoch,
        &cred,
        &pi,
        &EmptyRevocationList,
    )
    .context("proof verification failed")
}
