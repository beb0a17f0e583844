use anyhow::Result;
use day8::{get_greatest_scenic_score, get_num_visible};
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    Ok(match part {
        Part::First => format!("Number of visible trees: {}", get_num_visible(input)?),
        Part::Second => format!(
            "Best tree spot has score: {}",
            get_greatest_scenic_score(input)?
        ),
    })
}

fn main() {
    util::run(solve);
}
