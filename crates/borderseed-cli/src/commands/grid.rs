//! `borderseed grid`: print an entropy grid or resolve a pattern on it.

use borderseed_core::{
    CellFormat, ChecksumCompletionEngine, CompletionSource, EntropyGrid, GridCell, GridConfig,
    assemble, final_word_by_number, parse_pattern,
};
use serde::Serialize;

pub struct GridCommandConfig<'a> {
    pub seed: Option<&'a str>,
    pub max_entropy: bool,
    pub format: CellFormat,
    pub pattern: Option<&'a str>,
    pub number: Option<u32>,
    pub json: bool,
}

#[derive(Serialize)]
struct GridReport {
    seed: Option<String>,
    format: CellFormat,
    cells: Vec<String>,
}

#[derive(Serialize)]
struct PatternReport {
    seed: Option<String>,
    pattern: Vec<String>,
    words: Vec<String>,
    candidates: Vec<String>,
    number: Option<u32>,
    final_word: Option<String>,
    mnemonic: Option<String>,
}

pub fn run(config: GridCommandConfig<'_>) {
    let engine = ChecksumCompletionEngine::english();
    let wordlist = engine.wordlist();

    let grid = match (config.seed, config.max_entropy) {
        (Some(seed), _) => {
            let words: Vec<&str> = seed.split_whitespace().collect();
            EntropyGrid::from_seed(&words, wordlist).unwrap_or_else(|e| super::exit_with(e))
        }
        (None, true) => EntropyGrid::random(wordlist, &mut rand::rng()),
        (None, false) => EntropyGrid::generate(&engine, &mut rand::rng())
            .unwrap_or_else(|e| super::exit_with(e)),
    };

    match config.pattern {
        Some(pattern) => {
            let cells = parse_pattern(pattern).unwrap_or_else(|e| super::exit_with(e));
            show_pattern(&engine, &grid, &cells, config.number, config.json);
        }
        None => show_grid(&grid, config.format, config.json),
    }
}

fn show_grid(grid: &EntropyGrid, format: CellFormat, json: bool) {
    if json {
        super::print_json(&GridReport {
            seed: grid.seed().map(str::to_string),
            format,
            cells: grid.cells(format),
        });
        return;
    }

    println!("{}", grid.render(&GridConfig {
        cell_format: format,
        header: true,
    }));
    println!();
    match grid.seed() {
        Some(seed) => println!("Recovery Phrase: {seed}"),
        None => println!(
            "Maximum Entropy Grid - keep this safe, there is no way to regenerate it if lost."
        ),
    }
}

fn show_pattern(
    engine: &ChecksumCompletionEngine,
    grid: &EntropyGrid,
    cells: &[GridCell],
    number: Option<u32>,
    json: bool,
) {
    let partial = grid
        .partial_at(cells, engine.wordlist())
        .unwrap_or_else(|e| super::exit_with(e));
    let candidates = engine.compute_candidates(&partial);
    let final_word = number.map(|n| {
        final_word_by_number(engine, &partial, n).unwrap_or_else(|e| super::exit_with(e))
    });
    let mnemonic = final_word.as_deref().map(|w| assemble(&partial, w));

    if json {
        super::print_json(&PatternReport {
            seed: grid.seed().map(str::to_string),
            pattern: cells.iter().map(GridCell::to_string).collect(),
            words: partial.words().to_vec(),
            candidates: candidates.into_vec(),
            number,
            final_word,
            mnemonic,
        });
        return;
    }

    if let Some(seed) = grid.seed() {
        println!("Grid seed: {seed}\n");
    }
    for (i, (cell, word)) in cells.iter().zip(partial.words()).enumerate() {
        println!("  {:>2}. {:<5} {word}", i + 1, cell.to_string());
    }
    println!();
    match (final_word, mnemonic) {
        (Some(word), Some(mnemonic)) => {
            println!("Final word: {word}");
            println!("Mnemonic:   {mnemonic}");
        }
        _ => {
            println!("{} valid final words:", candidates.len());
            for (n, word) in candidates.numbered() {
                println!("  {n:>4}. {word}");
            }
        }
    }
}
