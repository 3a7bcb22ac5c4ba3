use borderseed_core::{Contribution, SeedError, expected_bits, extract};
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
struct ExtractRow {
    face: u32,
    contribution: Option<Contribution>,
}

/// Contributions for 1-based `faces`, or every face of the die when empty.
fn extract_rows(sides: u32, faces: &[u32]) -> Result<Vec<ExtractRow>, SeedError> {
    if sides == 0 {
        return Err(SeedError::Malformed("die must have at least one side".into()));
    }
    let faces: Vec<u32> = if faces.is_empty() {
        (1..=sides).collect()
    } else {
        faces.to_vec()
    };

    faces
        .into_iter()
        .map(|face| {
            let outcome = face.checked_sub(1).ok_or_else(|| {
                SeedError::Malformed(format!("face 0 out of range for a {sides}-sided die"))
            })?;
            Ok(ExtractRow {
                face,
                contribution: extract(outcome, sides)?,
            })
        })
        .collect()
}

pub fn run(sides: u32, faces: &[u32], json: bool) {
    let rows = extract_rows(sides, faces).unwrap_or_else(|e| super::exit_with(e));

    if json {
        super::print_json(&rows);
        return;
    }

    println!("d{sides}: {:.3} bits per roll on average\n", expected_bits(sides));
    println!("  {:>6} {:>5} {:>8}  {}", "Face", "Bits", "Value", "Binary");
    println!("  {}", "-".repeat(36));
    for row in &rows {
        match row.contribution {
            Some(c) => println!(
                "  {:>6} {:>5} {:>8}  {:0width$b}",
                row.face,
                c.bits,
                c.value,
                c.value,
                width = c.bits as usize
            ),
            None => println!("  {:>6} {:>5} {:>8}  (no entropy)", row.face, 0, "-"),
        }
    }
}
