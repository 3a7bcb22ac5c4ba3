//! Border Wallet entropy grid.
//!
//! The whole dictionary is shuffled into a 128 x 16 grid (columns `A`-`P`,
//! rows `001`-`128`). A user memorizes a pattern of 11 or 23 cells instead
//! of words; the words under the pattern form a partial mnemonic that the
//! completion engine then finishes.
//!
//! Seeded grids are regenerated from a 12-word grid seed through the
//! "uheprng" generator (a 48-lag multiply-with-carry seeded by the Mash
//! string hash). The arithmetic is carried out in `f64` exactly as the
//! printed grids were produced, so a grid seed always yields the same
//! cells on every platform.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::completion::{CompletionSource, PartialMnemonic};
use crate::error::{Result, SeedError};
use crate::flows::final_word_by_number;
use crate::length::MnemonicLength;
use crate::wordlist::{WORDLIST_LEN, WordIndex, WordlistIndex, normalize_word};

/// Grid columns, labelled `A` to `P`.
pub const COLUMNS: usize = 16;

/// Grid rows, labelled `001` to `128`.
pub const ROWS: usize = WORDLIST_LEN / COLUMNS;

/// Words in a grid seed.
pub const GRID_SEED_WORDS: usize = 12;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// Zero-based grid coordinate, always inside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridCell")]
pub struct GridCell {
    row: u16,
    col: u8,
}

#[derive(Deserialize)]
struct RawGridCell {
    row: u16,
    col: u8,
}

impl TryFrom<RawGridCell> for GridCell {
    type Error = SeedError;

    fn try_from(raw: RawGridCell) -> Result<Self> {
        Self::new(raw.row, raw.col)
    }
}

impl GridCell {
    pub fn new(row: u16, col: u8) -> Result<Self> {
        if usize::from(row) >= ROWS || usize::from(col) >= COLUMNS {
            return Err(SeedError::Malformed(format!(
                "cell ({row}, {col}) outside the {ROWS}x{COLUMNS} grid"
            )));
        }
        Ok(Self { row, col })
    }

    /// Cell holding the `index`-th shuffled word (row-major).
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= WORDLIST_LEN {
            return Err(SeedError::Malformed(format!("cell index {index} outside the grid")));
        }
        Ok(Self {
            row: (index / COLUMNS) as u16,
            col: (index % COLUMNS) as u8,
        })
    }

    /// Zero-based row, `0..128`.
    pub fn row(self) -> u16 {
        self.row
    }

    /// Zero-based column, `0..16`.
    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major position, `row * 16 + col`.
    pub fn index(self) -> usize {
        usize::from(self.row) * COLUMNS + usize::from(self.col)
    }

    pub fn column_label(self) -> char {
        char::from(b'A' + self.col)
    }

    /// Row label as printed on the grid: one-based, three digits.
    pub fn row_label(self) -> String {
        format!("{:03}", self.row + 1)
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.column_label(), self.row + 1)
    }
}

impl std::str::FromStr for GridCell {
    type Err = SeedError;

    /// Parse labels such as `A1`, `p128` or `C007`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let malformed = || SeedError::Malformed(format!("'{s}' is not a grid cell (A1..P128)"));
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(malformed)?.to_ascii_uppercase();
        if !('A'..='P').contains(&letter) {
            return Err(malformed());
        }
        let row: u16 = chars.as_str().parse().map_err(|_| malformed())?;
        if row == 0 || usize::from(row) > ROWS {
            return Err(malformed());
        }
        Ok(Self {
            row: row - 1,
            col: letter as u8 - b'A',
        })
    }
}

/// Parse a comma- or whitespace-separated list of cell labels.
pub fn parse_pattern(text: &str) -> Result<Vec<GridCell>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// How a cell is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Four spaces; a pattern-planning sheet.
    Blank,
    /// First four letters of the word, which identify it uniquely.
    #[default]
    Char,
    /// One-based dictionary number, four digits.
    Num,
    /// Zero-based dictionary index, four digits.
    Idx,
    /// One-based dictionary number in hex, three digits after a space.
    Hex,
}

impl CellFormat {
    pub const ALL: [CellFormat; 5] = [Self::Blank, Self::Char, Self::Num, Self::Idx, Self::Hex];

    pub fn render(self, word: &str, index: WordIndex) -> String {
        let number = u32::from(index.get()) + 1;
        match self {
            Self::Blank => "    ".to_string(),
            Self::Char => word.chars().take(4).collect(),
            Self::Num => format!("{number:04}"),
            Self::Idx => format!("{:04}", index.get()),
            Self::Hex => format!(" {number:03x}"),
        }
    }
}

impl std::fmt::Display for CellFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "blank"),
            Self::Char => write!(f, "char"),
            Self::Num => write!(f, "num"),
            Self::Idx => write!(f, "idx"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

impl std::str::FromStr for CellFormat {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blank" => Ok(Self::Blank),
            "char" => Ok(Self::Char),
            "num" => Ok(Self::Num),
            "idx" => Ok(Self::Idx),
            "hex" => Ok(Self::Hex),
            other => Err(SeedError::Malformed(format!(
                "unknown cell format '{other}' (expected blank, char, num, idx or hex)"
            ))),
        }
    }
}

/// Rendering options for [`EntropyGrid::render`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub cell_format: CellFormat,
    /// Print column letters above and below the cells.
    pub header: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_format: CellFormat::Char,
            header: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// The dictionary shuffled into grid order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntropyGrid {
    indices: Vec<WordIndex>,
    words: Vec<String>,
    seed: Option<String>,
}

impl EntropyGrid {
    /// Regenerate the grid printed for `seed`.
    ///
    /// Every seed word must be a dictionary word; the seed does not need a
    /// valid checksum.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnsupportedLength`] unless the seed has 12 words, then
    /// [`SeedError::InvalidWord`] for the first unknown word.
    pub fn from_seed<S: AsRef<str>>(seed: &[S], wordlist: &WordlistIndex) -> Result<Self> {
        if seed.len() != GRID_SEED_WORDS {
            return Err(SeedError::UnsupportedLength { words: seed.len() });
        }
        let words: Vec<String> = seed.iter().map(|w| normalize_word(w.as_ref())).collect();
        for word in &words {
            wordlist.lookup(word)?;
        }
        let seed = words.join(" ");

        let mut prng = Uheprng::new();
        prng.hash_string(&seed);
        let mut indices = identity();
        for i in (1..indices.len()).rev() {
            let j = prng.random(i as u32 + 1) as usize;
            indices.swap(i, j);
        }
        log::debug!("regenerated entropy grid from a {GRID_SEED_WORDS}-word grid seed");
        Ok(Self::build(indices, wordlist, Some(seed)))
    }

    /// Generate a fresh grid seed (a random valid 12-word mnemonic) and
    /// its grid.
    pub fn generate<S, R>(source: &S, rng: &mut R) -> Result<Self>
    where
        S: CompletionSource + ?Sized,
        R: Rng + ?Sized,
    {
        let wordlist = source.wordlist();
        let length = MnemonicLength::Words12;
        let words: Vec<&str> = (0..length.partial_len())
            .map(|_| wordlist.word(WordIndex::from_bits(rng.random_range(0..WORDLIST_LEN as u32))))
            .collect();
        let partial = PartialMnemonic::new(&words, wordlist)?;
        let range = length.spec().final_word_range();
        let last = final_word_by_number(source, &partial, rng.random_range(range))?;

        let mut seed = words;
        seed.push(&last);
        Self::from_seed(&seed, wordlist)
    }

    /// "Maximum entropy" grid shuffled with `rng`. It has no seed and
    /// cannot be regenerated.
    pub fn random<R: Rng + ?Sized>(wordlist: &WordlistIndex, rng: &mut R) -> Self {
        let mut indices = identity();
        for i in (1..indices.len()).rev() {
            let j = rng.random_range(0..=i);
            indices.swap(i, j);
        }
        log::debug!("generated unseeded entropy grid");
        Self::build(indices, wordlist, None)
    }

    fn build(indices: Vec<WordIndex>, wordlist: &WordlistIndex, seed: Option<String>) -> Self {
        let words = indices.iter().map(|&i| wordlist.word(i).to_string()).collect();
        Self {
            indices,
            words,
            seed,
        }
    }

    /// Grid seed, space-joined; `None` for a maximum entropy grid.
    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// Words in row-major cell order.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, cell: GridCell) -> &str {
        &self.words[cell.index()]
    }

    /// Dictionary index of the word in `cell`.
    pub fn word_index(&self, cell: GridCell) -> WordIndex {
        self.indices[cell.index()]
    }

    pub fn cell_text(&self, cell: GridCell, format: CellFormat) -> String {
        format.render(self.word(cell), self.word_index(cell))
    }

    /// Every cell rendered in `format`, row-major.
    pub fn cells(&self, format: CellFormat) -> Vec<String> {
        self.words
            .iter()
            .zip(&self.indices)
            .map(|(w, &i)| format.render(w, i))
            .collect()
    }

    /// Words under a memorized pattern, in pattern order.
    pub fn words_at(&self, pattern: &[GridCell]) -> Vec<&str> {
        pattern.iter().map(|&c| self.word(c)).collect()
    }

    /// The pattern's words as a partial mnemonic.
    ///
    /// # Errors
    ///
    /// [`SeedError::UnsupportedLength`] unless the pattern is one cell
    /// short of a standard mnemonic length.
    pub fn partial_at(&self, pattern: &[GridCell], wordlist: &WordlistIndex) -> Result<PartialMnemonic> {
        PartialMnemonic::new(&self.words_at(pattern), wordlist)
    }

    /// Text table of the grid, one line per row.
    pub fn render(&self, config: &GridConfig) -> String {
        let cells = self.cells(config.cell_format);
        let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(4);
        let header = {
            let letters: Vec<String> = (0..COLUMNS as u8)
                .map(|c| format!("{:^width$}", char::from(b'A' + c)))
                .collect();
            format!("    {}", letters.join(" "))
        };

        let mut lines = Vec::with_capacity(ROWS + 2);
        if config.header {
            lines.push(header.clone());
        }
        for (row, chunk) in cells.chunks(COLUMNS).enumerate() {
            let padded: Vec<String> = chunk.iter().map(|c| format!("{c:<width$}")).collect();
            lines.push(format!("{:03} {}", row + 1, padded.join(" ")));
        }
        if config.header {
            lines.push(header);
        }
        lines.join("\n")
    }
}

fn identity() -> Vec<WordIndex> {
    (0..WORDLIST_LEN as u32).map(WordIndex::from_bits).collect()
}

// ---------------------------------------------------------------------------
// uheprng
// ---------------------------------------------------------------------------

const TWO_POW_32: f64 = 4_294_967_296.0;
const TWO_POW_NEG_32: f64 = 2.328_306_436_538_696_3e-10;
const TWO_POW_NEG_53: f64 = 1.110_223_024_625_156_5e-16;

/// `ToUint32` for the non-negative finite values the Mash hash produces.
fn to_uint32(x: f64) -> f64 {
    f64::from(x as u64 as u32)
}

/// Mash string hash. Its state carries over between calls.
#[derive(Debug, Clone)]
struct Mash {
    n: f64,
}

impl Mash {
    const INITIAL: f64 = 4_022_871_197.0;

    fn new() -> Self {
        Self { n: Self::INITIAL }
    }

    fn reset(&mut self) {
        self.n = Self::INITIAL;
    }

    /// Mix `data` (as UTF-16 code units) into the state and return a
    /// fraction in `[0, 1)`.
    fn hash(&mut self, data: &str) -> f64 {
        let mut n = self.n;
        for unit in data.encode_utf16() {
            n += f64::from(unit);
            let mut h = 0.025_196_032_824_169_38 * n;
            n = to_uint32(h);
            h -= n;
            h *= n;
            n = to_uint32(h);
            h -= n;
            n += h * TWO_POW_32;
        }
        self.n = n;
        to_uint32(n) * TWO_POW_NEG_32
    }
}

/// Ultra-high-entropy PRNG: 48-lag multiply-with-carry over `f64` state.
#[derive(Debug, Clone)]
struct Uheprng {
    s: [f64; Self::ORDER],
    c: f64,
    p: usize,
    mash: Mash,
}

impl Uheprng {
    const ORDER: usize = 48;

    fn new() -> Self {
        let mut mash = Mash::new();
        let mut s = [0.0; Self::ORDER];
        for x in &mut s {
            *x = mash.hash(" ");
        }
        Self {
            s,
            c: 1.0,
            p: Self::ORDER,
            mash,
        }
    }

    /// Trimmed, with control characters removed.
    fn clean_string(input: &str) -> String {
        input.trim().chars().filter(|&c| c > '\u{1f}').collect()
    }

    fn hash_string(&mut self, input: &str) {
        let input = Self::clean_string(input);
        if input.is_empty() {
            self.mash.reset();
            return;
        }
        self.mash.hash(&input);
        for unit in input.encode_utf16() {
            let key = unit.to_string();
            for j in 0..Self::ORDER {
                self.s[j] -= self.mash.hash(&key);
                if self.s[j] < 0.0 {
                    self.s[j] += 1.0;
                }
            }
        }
    }

    fn next_raw(&mut self) -> f64 {
        self.p += 1;
        if self.p >= Self::ORDER {
            self.p = 0;
        }
        let t = 1_768_863.0 * self.s[self.p] + self.c * TWO_POW_NEG_32;
        self.c = t.trunc();
        self.s[self.p] = t - self.c;
        self.s[self.p]
    }

    /// Integer in `[0, range)` built from 53 random bits.
    fn random(&mut self, range: u32) -> u32 {
        let high = self.next_raw();
        let low = (self.next_raw() * 2_097_152.0).trunc();
        (f64::from(range) * (high + low * TWO_POW_NEG_53)).floor() as u32
    }
}
