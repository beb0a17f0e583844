use anyhow::Result;
use day5::{move_and_get_top_9000, move_and_get_top_9001};
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let top = match part {
        Part::First => move_and_get_top_9000(input)?,
        Part::Second => move_and_get_top_9001(input)?,
    };

    Ok(format!("Top crates: {top}"))
}

fn main() {
    util::run(solve);
}
