use borderseed_core::{
    ChecksumCompletionEngine, assemble, final_word_by_number, random_byte,
    random_final_word_number,
};
use serde::Serialize;

#[derive(Serialize)]
struct FinalWordReport {
    number: u32,
    random: bool,
    word: String,
    mnemonic: String,
}

pub fn run(args: &[String], number: Option<u32>, random: bool, json: bool) {
    let engine = ChecksumCompletionEngine::english();
    let partial = super::partial_or_exit(&engine, args);

    let number = match number {
        Some(n) if !random => n,
        _ => {
            let byte = random_byte().unwrap_or_else(|e| super::exit_with(e));
            random_final_word_number(partial.length(), byte)
        }
    };
    let word = final_word_by_number(&engine, &partial, number).unwrap_or_else(|e| super::exit_with(e));
    let mnemonic = assemble(&partial, &word);

    if json {
        super::print_json(&FinalWordReport {
            number,
            random,
            word,
            mnemonic,
        });
        return;
    }

    let range = partial.spec().final_word_range();
    println!(
        "Final word number: {number} (of {}-{}){}",
        range.start(),
        range.end(),
        if random { ", drawn at random" } else { "" }
    );
    println!("Final word:        {word}");
    println!("Mnemonic:          {mnemonic}");
}
