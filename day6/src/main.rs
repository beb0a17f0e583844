use anyhow::Result;
use day6::marker_end;
use util::Part;

fn solve(input: &str, part: Part) -> Result<String> {
    let (n, found, missing) = match part {
        Part::First => (4, "Start sequence", "No start sequence found"),
        Part::Second => (14, "Start packet sequence", "No packet start found"),
    };

    Ok(match marker_end(input, n) {
        Some(pos) => format!("{found} ended at character {pos}"),
        None => missing.to_string(),
    })
}

fn main() {
    util::run(solve);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Part::First, "mjqjpqmgbljsphdztnvjfqwrcgsmlb", "Start sequence ended at character 7")]
    #[case(Part::Second, "mjqjpqmgbljsphdztnvjfqwrcgsmlb", "Start packet sequence ended at character 19")]
    #[case(Part::First, "aaaa", "No start sequence found")]
    #[case(Part::Second, "abcdefg", "No packet start found")]
    fn answer_line(#[case] part: Part, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(solve(input, part).unwrap(), expected);
    }
}
