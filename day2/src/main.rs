use anyhow::Result;
use day2::{total_score_results, total_score_shapes};
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let total = match part {
        Part::First => total_score_shapes(input)?,
        Part::Second => total_score_results(input)?,
    };

    Ok(format!("Total score: {total}"))
}

fn main() {
    util::run(solve);
}
