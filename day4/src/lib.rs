use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Inclusive range of section ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    start: u32,
    end: u32,
}

impl SectionRange {
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.start > other.end || self.end < other.start)
    }
}

impl FromStr for SectionRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| anyhow!("Missing '-' in range {s:?}"))?;
        let start: u32 = start.trim().parse()?;
        let end: u32 = end.trim().parse()?;

        if start > end {
            return Err(anyhow!("Range starts after it ends: {s:?}"));
        }

        Ok(Self { start, end })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    first: SectionRange,
    second: SectionRange,
}

impl FromStr for Assignment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (first, second) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Missing ',' between ranges"))?;

        Ok(Self {
            first: first.parse()?,
            second: second.parse()?,
        })
    }
}

fn num_assignments_where<F>(input: &str, condition_true: F) -> Result<usize>
where
    F: Fn(&Assignment) -> bool,
{
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            line.parse::<Assignment>()
                .with_context(|| format!("line {}: {line:?}", i + 1))
        })
        .try_fold(0, |count, assignment| {
            Ok(count + usize::from(condition_true(&assignment?)))
        })
}

pub fn num_overlap_full(input: &str) -> Result<usize> {
    num_assignments_where(input, |a| {
        a.first.contains(&a.second) || a.second.contains(&a.first)
    })
}

pub fn num_overlap_any(input: &str) -> Result<usize> {
    num_assignments_where(input, |a| a.first.overlaps(&a.second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let total = num_overlap_full(TEST_INPUT);
        assert!(total.is_ok());
        assert_eq!(total.unwrap(), 2);
    }

    #[test]
    fn part2() {
        let total = num_overlap_any(TEST_INPUT);
        assert!(total.is_ok());
        assert_eq!(total.unwrap(), 4);
    }

    #[rstest]
    #[case("1-5,2-3", true, true)]
    #[case("2-3,1-5", true, true)]
    #[case("1-3,3-5", false, true)]
    #[case("1-2,3-5", false, false)]
    #[case("4-4,4-4", true, true)]
    fn single_assignment(#[case] input: &str, #[case] full: bool, #[case] any: bool) {
        assert_eq!(num_overlap_full(input).unwrap(), usize::from(full));
        assert_eq!(num_overlap_any(input).unwrap(), usize::from(any));
    }

    #[rstest]
    #[case("1-5")]
    #[case("1-5,2")]
    #[case("a-5,2-3")]
    #[case("5-1,2-3")]
    fn malformed_is_error(#[case] input: &str) {
        assert!(num_overlap_any(input).is_err());
    }
}
