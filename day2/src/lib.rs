use anyhow::{anyhow, Context, Result};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Lose,
    Draw,
    Win,
}

impl MatchResult {
    fn value(&self) -> u32 {
        match self {
            Self::Lose => 0,
            Self::Draw => 3,
            Self::Win => 6,
        }
    }
}

#[derive(Error, Debug)]
#[error("Error parsing into MatchResult: {0:?}")]
pub struct MatchResultParseError(String);

impl TryFrom<&str> for MatchResult {
    type Error = MatchResultParseError;

    fn try_from(symbol: &str) -> Result<Self, Self::Error> {
        match symbol {
            "X" => Ok(Self::Lose),
            "Y" => Ok(Self::Draw),
            "Z" => Ok(Self::Win),
            _ => Err(MatchResultParseError(symbol.to_string())),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Shape {
    Rock,
    Paper,
    Scissors,
}

#[derive(Error, Debug)]
#[error("Error parsing into Shape: {0:?}")]
pub struct ShapeParseError(String);

impl TryFrom<&str> for Shape {
    type Error = ShapeParseError;

    fn try_from(symbol: &str) -> Result<Self, Self::Error> {
        match symbol {
            "A" | "X" => Ok(Self::Rock),
            "B" | "Y" => Ok(Self::Paper),
            "C" | "Z" => Ok(Self::Scissors),
            _ => Err(ShapeParseError(symbol.to_string())),
        }
    }
}

impl Shape {
    fn value(&self) -> u32 {
        match self {
            Self::Rock => 1,
            Self::Paper => 2,
            Self::Scissors => 3,
        }
    }

    /// Outcome for `ours` when playing against `theirs`.
    pub fn match_result(theirs: &Self, ours: &Self) -> MatchResult {
        match (theirs, ours) {
            (Self::Rock, Self::Paper)
            | (Self::Paper, Self::Scissors)
            | (Self::Scissors, Self::Rock) => MatchResult::Win,
            (s1, s2) if s1 == s2 => MatchResult::Draw,
            _ => MatchResult::Lose,
        }
    }

    /// The shape we have to play against `theirs` to end up with `result`.
    pub fn from_result(theirs: &Self, result: &MatchResult) -> Self {
        match (theirs, result) {
            (s, MatchResult::Draw) => *s,
            (Self::Rock, MatchResult::Lose) | (Self::Paper, MatchResult::Win) => Self::Scissors,
            (Self::Paper, MatchResult::Lose) | (Self::Scissors, MatchResult::Win) => Self::Rock,
            (Self::Scissors, MatchResult::Lose) | (Self::Rock, MatchResult::Win) => Self::Paper,
        }
    }

    pub fn match_value(theirs: &Shape, ours: &Shape) -> u32 {
        Self::match_result(theirs, ours).value() + ours.value()
    }
}

fn split_round(line: &str) -> Result<(&str, &str)> {
    let symbols: [&str; 2] = line
        .split_whitespace()
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|v: Vec<_>| anyhow!("wrong number of symbols in a round: {}", v.len()))?;

    Ok((symbols[0], symbols[1]))
}

fn total_score<F>(input: &str, score_round: F) -> Result<u32>
where
    F: Fn(&str, &str) -> Result<u32>,
{
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            split_round(line)
                .and_then(|(theirs, second)| score_round(theirs, second))
                .with_context(|| format!("line {}: {line:?}", i + 1))
        })
        .sum()
}

/// Second column is the shape we play.
pub fn total_score_shapes(input: &str) -> Result<u32> {
    total_score(input, |theirs, ours| {
        let theirs = Shape::try_from(theirs)?;
        let ours = Shape::try_from(ours)?;
        Ok(Shape::match_value(&theirs, &ours))
    })
}

/// Second column is how the round has to end.
pub fn total_score_results(input: &str) -> Result<u32> {
    total_score(input, |theirs, result| {
        let theirs = Shape::try_from(theirs)?;
        let result = MatchResult::try_from(result)?;
        let ours = Shape::from_result(&theirs, &result);
        Ok(Shape::match_value(&theirs, &ours))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let res = total_score_shapes(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 15);
    }

    #[test]
    fn part2() {
        let res = total_score_results(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 12);
    }

    #[rstest]
    #[case(Shape::Rock, Shape::Rock, 4)]
    #[case(Shape::Rock, Shape::Paper, 8)]
    #[case(Shape::Rock, Shape::Scissors, 3)]
    #[case(Shape::Scissors, Shape::Rock, 7)]
    #[case(Shape::Paper, Shape::Scissors, 9)]
    fn match_value(#[case] theirs: Shape, #[case] ours: Shape, #[case] expected: u32) {
        assert_eq!(Shape::match_value(&theirs, &ours), expected);
    }

    #[rstest]
    #[case("A Q")]
    #[case("D X")]
    #[case("A")]
    #[case("A X B")]
    fn bad_round_is_error(#[case] input: &str) {
        assert!(total_score_shapes(input).is_err());
    }
}
