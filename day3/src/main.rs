use anyhow::Result;
use day3::{sum_badge_priorities, sum_shared_priorities};
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let total = match part {
        Part::First => sum_shared_priorities(input)?,
        Part::Second => sum_badge_priorities(input)?,
    };

    Ok(format!("Sum of priorities: {total}"))
}

fn main() {
    util::run(solve);
}
