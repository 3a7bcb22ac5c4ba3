use borderseed_core::{ChecksumCompletionEngine, CompletionSource};
use serde::Serialize;

#[derive(Serialize)]
struct CandidatesReport<'a> {
    partial: String,
    words: usize,
    spec: borderseed_core::EntropySpec,
    candidates: &'a [String],
}

pub fn run(args: &[String], json: bool) {
    let engine = ChecksumCompletionEngine::english();
    let partial = super::partial_or_exit(&engine, args);
    let candidates = engine.compute_candidates(&partial);

    if json {
        super::print_json(&CandidatesReport {
            partial: partial.to_string(),
            words: partial.len(),
            spec: *partial.spec(),
            candidates: candidates.as_slice(),
        });
        return;
    }

    let spec = partial.spec();
    println!(
        "{} valid final words for a {} mnemonic ({} varying bits + {} checksum bits):\n",
        candidates.len(),
        spec.length,
        spec.varying_bits,
        spec.checksum_bits
    );
    let numbered: Vec<(u32, &str)> = candidates.numbered().collect();
    for row in numbered.chunks(4) {
        let line: Vec<String> = row.iter().map(|(n, w)| format!("{n:>4}. {w:<10}")).collect();
        println!("  {}", line.join("  ").trim_end());
    }
}
