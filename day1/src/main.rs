use anyhow::Result;
use day1::top_calories_sum;
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let total = match part {
        Part::First => top_calories_sum::<1>(input)?,
        Part::Second => top_calories_sum::<3>(input)?,
    };

    Ok(format!("Sum of top calories: {total}"))
}

fn main() {
    util::run(solve);
}
