use anyhow::Result;
use day10::{get_crt_output, get_sum_signal_strengths};
use util::Part;

const CRT_WIDTH: usize = 40;

fn solve(input: &str, part: Part) -> Result<String> {
    Ok(match part {
        Part::First => format!(
            "Total signal strength: {}",
            get_sum_signal_strengths(input, 20, CRT_WIDTH)?
        ),
        Part::Second => get_crt_output(input, CRT_WIDTH)?,
    })
}

fn main() {
    util::run(solve);
}
