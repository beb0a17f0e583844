use anyhow::Result;
use day11::{get_monkey_business, WorryRelief};
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let (rounds, relief) = match part {
        Part::First => (20, WorryRelief::Divide(3)),
        Part::Second => (10000, WorryRelief::None),
    };

    Ok(format!(
        "Monkey business level: {}",
        get_monkey_business(input, rounds, relief)?
    ))
}

fn main() {
    util::run(solve);
}
