pub mod candidates;
pub mod check;
pub mod collect;
pub mod complete;
pub mod extract;
pub mod final_word;
pub mod grid;
pub mod server;

use borderseed_core::{ChecksumCompletionEngine, PartialMnemonic, PhysicalSource, SeedError};
use serde::Serialize;

/// Print `Error: ...` and exit with status 1.
pub fn exit_with(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}

/// Word arguments may be given one per argument or as one quoted string.
pub fn split_words(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|a| a.split_whitespace())
        .map(str::to_string)
        .collect()
}

/// Validate word arguments as a partial mnemonic, or exit.
pub fn partial_or_exit(engine: &ChecksumCompletionEngine, args: &[String]) -> PartialMnemonic {
    use borderseed_core::CompletionSource;
    PartialMnemonic::new(&split_words(args), engine.wordlist()).unwrap_or_else(|e| exit_with(e))
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => exit_with(e),
    }
}

/// One token of a roll sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollInput {
    /// Zero-based outcome.
    Outcome(u32),
    Undo,
}

/// Parse a roll as written by the user: a face `1..=N`, `h`/`t` for a
/// coin, or `-` to undo.
pub fn parse_roll(source: PhysicalSource, token: &str) -> Result<RollInput, SeedError> {
    let token = token.trim().to_ascii_lowercase();
    if token == "-" {
        return Ok(RollInput::Undo);
    }
    if source == PhysicalSource::Coin {
        match token.as_str() {
            "h" | "heads" => return Ok(RollInput::Outcome(0)),
            "t" | "tails" => return Ok(RollInput::Outcome(1)),
            _ => {}
        }
    }
    let face: u32 = token
        .parse()
        .map_err(|_| SeedError::Malformed(format!("'{token}' is not a roll")))?;
    if face == 0 || face > source.sides() {
        return Err(SeedError::Malformed(format!(
            "face {face} out of range for {source} (1..={})",
            source.sides()
        )));
    }
    Ok(RollInput::Outcome(face - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // parse_roll tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_die_faces_are_one_based() {
        assert_eq!(parse_roll(PhysicalSource::D6, "1").unwrap(), RollInput::Outcome(0));
        assert_eq!(parse_roll(PhysicalSource::D6, "6").unwrap(), RollInput::Outcome(5));
        assert_eq!(parse_roll(PhysicalSource::D20, "20").unwrap(), RollInput::Outcome(19));
    }

    #[test]
    fn test_parse_coin() {
        assert_eq!(parse_roll(PhysicalSource::Coin, "H").unwrap(), RollInput::Outcome(0));
        assert_eq!(parse_roll(PhysicalSource::Coin, "tails").unwrap(), RollInput::Outcome(1));
        assert_eq!(parse_roll(PhysicalSource::Coin, "2").unwrap(), RollInput::Outcome(1));
    }

    #[test]
    fn test_parse_undo() {
        assert_eq!(parse_roll(PhysicalSource::D20, "-").unwrap(), RollInput::Undo);
    }

    #[test]
    fn test_parse_rejects_bad_faces() {
        assert!(parse_roll(PhysicalSource::D6, "0").is_err());
        assert!(parse_roll(PhysicalSource::D6, "7").is_err());
        assert!(parse_roll(PhysicalSource::D6, "h").is_err());
        assert!(parse_roll(PhysicalSource::Coin, "3").is_err());
    }

    // -----------------------------------------------------------------------
    // split_words tests
    // -----------------------------------------------------------------------

    #[test]
    fn test_split_words_accepts_quoted_and_separate_args() {
        let args = vec!["abandon ability".to_string(), " able".to_string()];
        assert_eq!(split_words(&args), vec!["abandon", "ability", "able"]);
        assert!(split_words(&[]).is_empty());
    }
}
