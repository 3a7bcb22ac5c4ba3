//! CLI for borderseed: dice entropy and BIP39 final-word completion.

mod commands;

use borderseed_core::{CellFormat, MnemonicLength, PhysicalSource};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "borderseed")]
#[command(about = "borderseed: turn dice rolls into mnemonics and grid patterns into final words")]
#[command(version = borderseed_core::VERSION)]
struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the unbiased bits each die face contributes
    Extract {
        /// Number of sides on the die
        #[arg(long)]
        sides: u32,

        /// Faces as rolled (1..=sides). All faces when omitted.
        outcomes: Vec<u32>,
    },

    /// Collect entropy from coin flips or die rolls and encode it as a mnemonic
    Collect {
        /// Physical source: coin, d6 or d20
        #[arg(long, default_value = "d6")]
        source: PhysicalSource,

        /// Target mnemonic length (12, 15, 18, 21 or 24)
        #[arg(long, default_value = "12")]
        words: MnemonicLength,

        /// Top up unfinished entropy with OS random bytes
        #[arg(long)]
        pad: bool,

        /// Rolls as faces (1..=N), coin flips as h/t. "-" undoes the previous roll.
        #[arg(allow_hyphen_values = true)]
        rolls: Vec<String>,
    },

    /// List every valid final word for a partial mnemonic
    Candidates {
        /// 11, 14, 17, 20 or 23 words (one quoted argument also works)
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Pick the final word by final word number, or at random
    FinalWord {
        /// Final word number (1-128 for 12 words, 1-8 for 24 words)
        #[arg(long, conflicts_with = "random", required_unless_present = "random")]
        number: Option<u32>,

        /// Draw the final word number from OS randomness
        #[arg(long)]
        random: bool,

        /// Partial mnemonic
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Check whether a chosen final word completes a partial mnemonic
    CheckFinal {
        /// Final word to check
        word: String,

        /// Partial mnemonic
        #[arg(long, num_args = 1.., required = true)]
        partial: Vec<String>,
    },

    /// Check a full mnemonic: dictionary words, length and checksum
    Check {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Print an entropy grid, or resolve a memorized pattern on it
    Grid {
        /// 12-word grid seed to regenerate (a new seed is generated when omitted)
        #[arg(long, conflicts_with = "max_entropy")]
        seed: Option<String>,

        /// Shuffle without a seed. The grid cannot be regenerated.
        #[arg(long)]
        max_entropy: bool,

        /// Cell format: char, num, idx, hex or blank
        #[arg(long, default_value = "char")]
        format: CellFormat,

        /// Memorized pattern, e.g. "A1,B7,P128,..."
        #[arg(long)]
        pattern: Option<String>,

        /// Final word number for the pattern (lists all candidates when omitted)
        #[arg(long, requires = "pattern")]
        number: Option<u32>,
    },

    /// Complete a word prefix from the dictionary
    Complete {
        prefix: String,
    },

    /// Start the HTTP completion server
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8042")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let json = cli.json;
    match cli.command {
        Commands::Extract { sides, outcomes } => commands::extract::run(sides, &outcomes, json),
        Commands::Collect {
            source,
            words,
            pad,
            rolls,
        } => commands::collect::run(source, words, pad, &rolls, json),
        Commands::Candidates { words } => commands::candidates::run(&words, json),
        Commands::FinalWord {
            number,
            random,
            words,
        } => commands::final_word::run(&words, number, random, json),
        Commands::CheckFinal { word, partial } => {
            commands::check::run_final(&partial, &word, json)
        }
        Commands::Check { words } => commands::check::run(&words, json),
        Commands::Grid {
            seed,
            max_entropy,
            format,
            pattern,
            number,
        } => commands::grid::run(commands::grid::GridCommandConfig {
            seed: seed.as_deref(),
            max_entropy,
            format,
            pattern: pattern.as_deref(),
            number,
            json,
        }),
        Commands::Complete { prefix } => commands::complete::run(&prefix, json),
        Commands::Server { port, host } => commands::server::run(&host, port),
    }
}
