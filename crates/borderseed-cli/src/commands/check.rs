//! `borderseed check` and `borderseed check-final`.

use borderseed_core::{ChecksumCompletionEngine, check_final_word, check_mnemonic};

/// Word checker for a complete mnemonic. Exits 1 when it is invalid.
pub fn run(args: &[String], json: bool) {
    let engine = ChecksumCompletionEngine::english();
    let words = super::split_words(args);
    let report = check_mnemonic(&engine, &words);

    if json {
        super::print_json(&report);
    } else {
        let mark = |ok: bool| if ok { "✓" } else { "✗" };
        println!(
            "  {} length      {} words{}",
            mark(report.length_supported),
            report.word_count,
            if report.length_supported { "" } else { " (expected 12, 15, 18, 21 or 24)" }
        );
        if report.unknown_words.is_empty() {
            println!("  ✓ words       all in the dictionary");
        } else {
            println!("  ✗ words       not in the dictionary: {}", report.unknown_words.join(", "));
        }
        println!("  {} checksum", mark(report.checksum_valid));

        if !report.checksum_valid {
            if let Some(candidates) = &report.candidates {
                let preview: Vec<&str> = candidates.iter().take(8).map(String::as_str).collect();
                println!(
                    "\n  {} valid final words, e.g. {}",
                    candidates.len(),
                    preview.join(", ")
                );
            }
        }
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
}

/// Free-text final word check.
pub fn run_final(partial_args: &[String], word: &str, json: bool) {
    let engine = ChecksumCompletionEngine::english();
    let partial = super::partial_or_exit(&engine, partial_args);
    let check = check_final_word(&engine, &partial, word);

    if json {
        super::print_json(&check);
    } else if let (Some(number), Some(mnemonic)) = (check.number, &check.mnemonic) {
        println!("✓ '{}' is a valid final word (final word number {number})", check.word);
        println!("  {mnemonic}");
    } else {
        println!(
            "✗ '{}' does not complete this {} with a valid checksum",
            check.word,
            partial.length()
        );
    }

    if !check.accepted {
        std::process::exit(1);
    }
}
