//! `borderseed collect`: physical entropy to mnemonic.

use bip39::Mnemonic;
use borderseed_core::{
    CollectionConfig, CollectionSession, CollectionSummary, MnemonicLength, PhysicalSource,
};
use serde::Serialize;

use super::RollInput;

#[derive(Serialize)]
struct CollectReport {
    #[serde(flatten)]
    summary: CollectionSummary,
    padded: bool,
    entropy: Option<String>,
    mnemonic: Option<String>,
}

pub fn run(source: PhysicalSource, length: MnemonicLength, pad: bool, rolls: &[String], json: bool) {
    let mut session = CollectionSession::new(CollectionConfig {
        length,
        pad_with_os_random: pad,
    });

    for token in rolls {
        match super::parse_roll(source, token).unwrap_or_else(|e| super::exit_with(e)) {
            RollInput::Undo => {
                if session.undo().is_none() {
                    log::warn!("nothing to undo");
                }
            }
            RollInput::Outcome(outcome) => {
                session
                    .record(source, outcome)
                    .unwrap_or_else(|e| super::exit_with(e));
            }
        }
    }

    let summary = session.summary();
    let padded = !summary.complete && pad;
    let (entropy, mnemonic) = if summary.complete || pad {
        let bytes = session
            .finish(&mut rand::rng())
            .unwrap_or_else(|e| super::exit_with(e));
        let mnemonic = Mnemonic::from_entropy(&bytes).unwrap_or_else(|e| super::exit_with(e));
        (Some(hex(&bytes)), Some(mnemonic.to_string()))
    } else {
        (None, None)
    };

    if json {
        super::print_json(&CollectReport {
            summary,
            padded,
            entropy,
            mnemonic,
        });
        return;
    }

    println!("Source:    {source} ({} rolls)", summary.rolls);
    println!("Target:    {} ({} bits)", summary.length, summary.bits_needed);
    println!(
        "Collected: {}/{} bits{}",
        summary.bits_collected,
        summary.bits_needed,
        if summary.complete { " (complete)" } else { "" }
    );
    if !summary.hex.is_empty() {
        println!("Hex:       {}", summary.hex);
    }

    match (entropy, mnemonic) {
        (Some(entropy), Some(mnemonic)) => {
            if padded {
                println!("\n⚠ Entropy was topped up with OS random bytes.");
            }
            println!("\nEntropy:   {entropy}");
            println!("Mnemonic:  {mnemonic}");
        }
        _ => {
            let remaining = summary.bits_needed - summary.bits_collected;
            let per_roll = borderseed_core::expected_bits(source.sides());
            println!(
                "\n{remaining} more bits needed (about {:.0} more {source} rolls), or pass --pad.",
                (f64::from(remaining) / per_roll).ceil()
            );
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
