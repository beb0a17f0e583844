use anyhow::Result;
use day4::{num_overlap_any, num_overlap_full};
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    Ok(match part {
        Part::First => format!(
            "Number of assigned pairs containing each other: {}",
            num_overlap_full(input)?
        ),
        Part::Second => format!("Number of overlapping pairs: {}", num_overlap_any(input)?),
    })
}

fn main() {
    util::run(solve);
}
