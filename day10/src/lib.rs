use anyhow::{anyhow, ensure, Context, Result};
use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::map,
    error::{FromExternalError, ParseError},
    sequence::preceded,
    IResult,
};
use util::{parse_number, parse_with_report, Span};

pub const REGISTER_INIT: i32 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instruction {
    Addx(i32),
    Noop,
}

impl Instruction {
    pub fn cycles(&self) -> usize {
        match self {
            Instruction::Addx(_) => 2,
            Instruction::Noop => 1,
        }
    }
}

fn parse_addx<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Instruction, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, std::num::ParseIntError>,
{
    map(preceded(tag("addx "), parse_number), Instruction::Addx)(i)
}

fn parse_noop<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Instruction, E>
where
    E: ParseError<Span<'a>>,
{
    map(tag("noop"), |_| Instruction::Noop)(i)
}

fn parse_instruction<'a, E>(i: Span<'a>) -> IResult<Span<'a>, Instruction, E>
where
    E: ParseError<Span<'a>> + FromExternalError<Span<'a>, std::num::ParseIntError>,
{
    alt((parse_addx, parse_noop))(i)
}

/// Parse the program and make sure the register never leaves the `i32` range.
pub fn get_instructions(input: &str) -> Result<Vec<Instruction>> {
    let instructions = input
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            parse_with_report(l.trim_end(), parse_instruction)
                .with_context(|| format!("line {}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    instructions
        .iter()
        .enumerate()
        .try_fold(REGISTER_INIT, |x, (i, instruction)| match *instruction {
            Instruction::Addx(value) => x
                .checked_add(value)
                .ok_or_else(|| anyhow!("instruction {}: register overflows", i + 1)),
            Instruction::Noop => Ok(x),
        })?;

    Ok(instructions)
}

/// Yields the value of the X register during every cycle.
///
/// An `addx` only takes effect once both of its cycles are over. The register
/// saturates at the `i32` bounds; `get_instructions` rejects programs that
/// would reach them.
#[derive(Debug, Clone)]
pub struct Cpu<I> {
    instructions: I,
    x: i32,
    pending: Option<i32>,
}

impl<I> Cpu<I>
where
    I: Iterator<Item = Instruction>,
{
    pub fn new(instructions: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            instructions: instructions.into_iter(),
            x: REGISTER_INIT,
            pending: None,
        }
    }
}

impl<I> Iterator for Cpu<I>
where
    I: Iterator<Item = Instruction>,
{
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(value) = self.pending.take() {
            let during = self.x;
            self.x = self.x.saturating_add(value);
            return Some(during);
        }

        match self.instructions.next()? {
            Instruction::Noop => Some(self.x),
            Instruction::Addx(value) => {
                self.pending = Some(value);
                Some(self.x)
            }
        }
    }
}

/// Sum of `cycle * X` for every cycle at `first_cycle`, then every
/// `cycle_size` cycles after that.
pub fn get_sum_signal_strengths(
    input: &str,
    first_cycle: usize,
    cycle_size: usize,
) -> Result<i64> {
    ensure!(cycle_size > 0, "Cycle size must not be zero");

    let instructions = get_instructions(input)?;
    tracing::debug!(
        cycles = instructions.iter().map(Instruction::cycles).sum::<usize>(),
        "running program"
    );

    Ok(Cpu::new(instructions)
        .enumerate()
        .map(|(i, x)| (i + 1, x))
        .filter(|(cycle, _)| *cycle >= first_cycle && (cycle - first_cycle) % cycle_size == 0)
        .inspect(|(cycle, x)| tracing::trace!(cycle, x, "sampled"))
        .map(|(cycle, x)| cycle as i64 * i64::from(x))
        .sum())
}

/// Draw one pixel per cycle, `cols` pixels per row. A pixel is lit when the
/// three pixel wide sprite centered on X covers it.
pub fn get_crt_output(input: &str, cols: usize) -> Result<String> {
    ensure!(cols > 0, "CRT width must not be zero");

    let pixels = Cpu::new(get_instructions(input)?)
        .enumerate()
        .map(|(i, x)| {
            if (i64::from(x) - (i % cols) as i64).abs() <= 1 {
                '#'
            } else {
                '.'
            }
        })
        .collect_vec();

    Ok(pixels
        .chunks(cols)
        .map(|row| row.iter().collect::<String>())
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INPUT: &str = include_str!("../data/test_input");
    const TEST_OUTPUT: &str = include_str!("../data/test_output");

    #[test]
    fn part1() {
        let res = get_sum_signal_strengths(TEST_INPUT, 20, 40);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 13140);
    }

    #[test]
    fn part2() {
        let output = get_crt_output(TEST_INPUT, 40);
        assert!(output.is_ok());
        assert_eq!(output.unwrap().as_str(), TEST_OUTPUT);
    }

    #[test]
    fn register_during_cycles() {
        let instructions = get_instructions("noop\naddx 3\naddx -5").unwrap();
        let values = Cpu::new(instructions).collect_vec();
        assert_eq!(values, vec![1, 1, 1, 4, 4]);
    }

    #[test]
    fn sampled_cycles() {
        let values = Cpu::new(get_instructions(TEST_INPUT).unwrap()).collect_vec();
        assert_eq!(values.len(), 240);
        assert_eq!(values[19], 21);
        assert_eq!(values[59], 19);
        assert_eq!(values[219], 18);
    }

    #[test]
    fn unknown_instruction_is_error() {
        assert!(get_instructions("noop\nmulx 3").is_err());
        assert!(get_instructions("addx").is_err());
    }

    #[test]
    fn register_overflow_is_error() {
        let input = "addx 2000000000\naddx 2000000000\nnoop";
        assert!(get_instructions(input).is_err());
        assert!(get_sum_signal_strengths(input, 20, 40).is_err());
        assert!(get_crt_output(input, 40).is_err());
    }

    #[test]
    fn zero_width_is_error() {
        assert!(get_sum_signal_strengths(TEST_INPUT, 20, 0).is_err());
        assert!(get_crt_output(TEST_INPUT, 0).is_err());
        assert!(get_crt_output("noop", 0).is_err());
    }
}
