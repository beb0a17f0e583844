use anyhow::{Context, Result};

/// Keeps the `N` largest values seen so far, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopN<const N: usize> {
    values: [u64; N],
}

impl<const N: usize> Default for TopN<N> {
    fn default() -> Self {
        Self { values: [0; N] }
    }
}

impl<const N: usize> TopN<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new value only ever displaces the current lowest one.
    pub fn insert(&mut self, value: u64) {
        match self.values.first_mut() {
            Some(lowest) if *lowest < value => *lowest = value,
            _ => return,
        }

        for i in 1..N {
            if self.values[i] < self.values[i - 1] {
                self.values.swap(i, i - 1);
            } else {
                break;
            }
        }
    }

    pub fn values(&self) -> &[u64; N] {
        &self.values
    }

    /// `None` when the sum does not fit in a `u64`.
    pub fn sum(&self) -> Option<u64> {
        self.values
            .iter()
            .try_fold(0u64, |sum, &value| sum.checked_add(value))
    }
}

/// Sum of the `N` biggest elf totals. Elves are separated by blank lines.
pub fn top_calories_sum<const N: usize>(input: &str) -> Result<u64> {
    let mut top = TopN::<N>::new();
    let mut current: Option<u64> = None;

    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if let Some(total) = current.take() {
                top.insert(total);
            }
        } else {
            let calories: u64 = line
                .parse()
                .with_context(|| format!("line {}: bad calorie count {line:?}", i + 1))?;
            let total = current.get_or_insert(0);
            *total = total
                .checked_add(calories)
                .with_context(|| format!("line {}: elf total overflows", i + 1))?;
        }
    }

    // the last elf is not necessarily followed by a blank line
    if let Some(total) = current {
        top.insert(total);
    }

    tracing::debug!(top = ?top.values(), "elf totals");

    top.sum().context("Sum of the top totals overflows")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let res = top_calories_sum::<1>(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 24000);
    }

    #[test]
    fn part2() {
        let res = top_calories_sum::<3>(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 45000);
    }

    #[test]
    fn trailing_blank_lines_ok() {
        let input = format!("{TEST_INPUT}\n\n\n");
        let res = top_calories_sum::<3>(input.as_str());
        assert_eq!(res.unwrap(), 45000);
    }

    #[test]
    fn fewer_elves_than_kept() {
        let res = top_calories_sum::<3>("100\n200\n\n50");
        assert_eq!(res.unwrap(), 350);
    }

    #[test]
    fn bad_line_is_error() {
        let res = top_calories_sum::<3>("100\nabc\n");
        assert!(res.is_err());
    }

    #[test]
    fn top_n_keeps_order() {
        let mut top = TopN::<3>::new();
        for v in [5, 1, 9, 3, 7, 8] {
            top.insert(v);
        }
        assert_eq!(top.values(), &[7, 8, 9]);
        assert_eq!(top.sum(), Some(24));
    }

    #[test]
    fn top_zero_is_empty() {
        let mut top = TopN::<0>::new();
        top.insert(10);
        assert_eq!(top.sum(), Some(0));
    }

    #[test]
    fn elf_total_overflow_is_error() {
        let res = top_calories_sum::<1>("18446744073709551615\n1\n");
        assert!(res.is_err());
    }

    #[test]
    fn top_sum_overflow_is_error() {
        let res = top_calories_sum::<2>("18446744073709551615\n\n1\n");
        assert!(res.is_err());

        let mut top = TopN::<2>::new();
        top.insert(u64::MAX);
        top.insert(1);
        assert_eq!(top.sum(), None);
    }
}
