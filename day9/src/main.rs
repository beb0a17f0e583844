use anyhow::Result;
use day9::count_unique_tail_positions;
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let knots = match part {
        Part::First => 2,
        Part::Second => 10,
    };

    Ok(format!(
        "Number of visited locations: {}",
        count_unique_tail_positions(input, knots)?
    ))
}

fn main() {
    util::run(solve);
}
