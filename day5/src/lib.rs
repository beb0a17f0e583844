use std::fmt;

use anyhow::{Context, Result};
use nom::{bytes::complete::tag, combinator::map, sequence::tuple, IResult};
use nom_supreme::error::ErrorTree;
use thiserror::Error;
use util::{parse_number, parse_with_report, Span};

/// Marker printed for a stack without crates.
pub const EMPTY_STACK: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    n: usize,
    from: usize,
    to: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveError {
    #[error("Stack {0} does not exist")]
    UnknownStack(usize),

    #[error("Stack {stack} holds {available} crates, cannot move {requested}")]
    StackUnderflow {
        stack: usize,
        requested: usize,
        available: usize,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StacksParseError {
    #[error("Missing stacks description")]
    MissingStacks,

    #[error("Unexpected crate label {0:?}")]
    UnexpectedCrate(char),

    #[error("Crate in column {column} but only {stacks} stacks are numbered")]
    CrateOutsideStacks { column: usize, stacks: usize },
}

/// Stacks of crates, ids starting at 1. The top crate is the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stacks {
    stacks: Vec<Vec<char>>,
}

impl Stacks {
    fn index(&self, id: usize) -> Result<usize, MoveError> {
        (1..=self.stacks.len())
            .contains(&id)
            .then(|| id - 1)
            .ok_or(MoveError::UnknownStack(id))
    }

    /// Lift the top `mv.n` crates off the origin stack, bottom-most first.
    fn lift(&mut self, mv: &Move) -> Result<Vec<char>, MoveError> {
        let from = self.index(mv.from)?;
        self.index(mv.to)?;

        let stack = &mut self.stacks[from];
        let remaining = stack
            .len()
            .checked_sub(mv.n)
            .ok_or(MoveError::StackUnderflow {
                stack: mv.from,
                requested: mv.n,
                available: stack.len(),
            })?;

        Ok(stack.split_off(remaining))
    }

    /// CrateMover 9000: one crate at a time.
    pub fn move_individual(&mut self, mv: &Move) -> Result<(), MoveError> {
        let lifted = self.lift(mv)?;
        self.stacks[mv.to - 1].extend(lifted.into_iter().rev());
        Ok(())
    }

    /// CrateMover 9001: all crates at once, keeping their order.
    pub fn move_grouped(&mut self, mv: &Move) -> Result<(), MoveError> {
        let lifted = self.lift(mv)?;
        self.stacks[mv.to - 1].extend(lifted);
        Ok(())
    }

    pub fn top_crates(&self) -> String {
        self.stacks
            .iter()
            .map(|stack| stack.last().copied().unwrap_or(EMPTY_STACK))
            .collect()
    }

    /// Parse the drawing, including the line with stack numbers.
    pub fn parse(drawing: &[&str]) -> Result<Self, StacksParseError> {
        let (labels, rows) = drawing
            .split_last()
            .ok_or(StacksParseError::MissingStacks)?;

        let num_stacks = labels.split_whitespace().count();
        if num_stacks == 0
            || labels
                .split_whitespace()
                .any(|label| label.parse::<usize>().is_err())
        {
            return Err(StacksParseError::MissingStacks);
        }

        let mut stacks = vec![Vec::new(); num_stacks];

        // read bottom-up so that pushing keeps the top crate last
        for row in rows.iter().rev() {
            for (column, label) in row.chars().skip(1).step_by(4).enumerate() {
                match label {
                    ' ' => {}
                    'A'..='Z' => stacks
                        .get_mut(column)
                        .ok_or(StacksParseError::CrateOutsideStacks {
                            column: column + 1,
                            stacks: num_stacks,
                        })?
                        .push(label),
                    _ => return Err(StacksParseError::UnexpectedCrate(label)),
                }
            }
        }

        Ok(Self { stacks })
    }
}

impl fmt::Display for Stacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stack) in self.stacks.iter().enumerate() {
            if stack.is_empty() {
                writeln!(f, "{}: empty", i + 1)?;
            } else {
                writeln!(f, "{}: {}", i + 1, stack.iter().collect::<String>())?;
            }
        }
        Ok(())
    }
}

fn parse_move(i: Span) -> IResult<Span, Move, ErrorTree<Span>> {
    map(
        tuple((
            tag("move "),
            parse_number,
            tag(" from "),
            parse_number,
            tag(" to "),
            parse_number,
        )),
        |(_, n, _, from, _, to)| Move { n, from, to },
    )(i)
}

pub fn get_stacks_and_moves(input: &str) -> Result<(Stacks, Vec<Move>)> {
    let mut lines = input.lines();

    let drawing = lines
        .by_ref()
        .take_while(|line| !line.trim().is_empty())
        .collect::<Vec<_>>();
    let stacks = Stacks::parse(&drawing)?;

    let moves = lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_with_report(line.trim_end(), parse_move))
        .collect::<Result<Vec<_>>>()?;

    Ok((stacks, moves))
}

fn rearrange<F>(input: &str, mut apply: F) -> Result<String>
where
    F: FnMut(&mut Stacks, &Move) -> Result<(), MoveError>,
{
    let (mut stacks, moves) = get_stacks_and_moves(input)?;
    tracing::debug!("starting stacks:\n{stacks}");

    for (i, mv) in moves.iter().enumerate() {
        apply(&mut stacks, mv).with_context(|| format!("move {}: {mv:?}", i + 1))?;
    }

    tracing::debug!("final stacks:\n{stacks}");
    Ok(stacks.top_crates())
}

pub fn move_and_get_top_9000(input: &str) -> Result<String> {
    rearrange(input, Stacks::move_individual)
}

pub fn move_and_get_top_9001(input: &str) -> Result<String> {
    rearrange(input, Stacks::move_grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let top = move_and_get_top_9000(TEST_INPUT);
        assert!(top.is_ok());
        assert_eq!(top.unwrap(), "CMZ".to_string());
    }

    #[test]
    fn part2() {
        let top = move_and_get_top_9001(TEST_INPUT);
        assert!(top.is_ok());
        assert_eq!(top.unwrap(), "MCD".to_string());
    }

    #[test]
    fn parse_drawing() {
        let (stacks, moves) = get_stacks_and_moves(TEST_INPUT).unwrap();
        assert_eq!(stacks.to_string(), "1: ZN\n2: MCD\n3: P\n");
        assert_eq!(moves.len(), 4);
        assert_eq!(moves[1], Move { n: 3, from: 1, to: 3 });
    }

    #[test]
    fn trimmed_drawing_lines() {
        // editors like to strip the trailing spaces of the drawing
        let input = TEST_INPUT
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(move_and_get_top_9000(input.as_str()).unwrap(), "CMZ");
    }

    #[test]
    fn empty_stack_marker() {
        let input = "[A]    \n 1   2 \n\nmove 1 from 1 to 2";
        assert_eq!(move_and_get_top_9000(input).unwrap(), "*A");
    }

    #[test]
    fn underflow_is_error() {
        let (mut stacks, _) = get_stacks_and_moves(TEST_INPUT).unwrap();
        let res = stacks.move_individual(&Move { n: 4, from: 3, to: 1 });
        assert_eq!(
            res,
            Err(MoveError::StackUnderflow {
                stack: 3,
                requested: 4,
                available: 1
            })
        );
    }

    #[test]
    fn unknown_stack_is_error() {
        let (mut stacks, _) = get_stacks_and_moves(TEST_INPUT).unwrap();
        let res = stacks.move_grouped(&Move { n: 1, from: 1, to: 4 });
        assert_eq!(res, Err(MoveError::UnknownStack(4)));
    }

    #[test]
    fn bad_move_line_is_error() {
        let input = TEST_INPUT.replace("move 2 from 2 to 1", "move two from 2 to 1");
        assert!(move_and_get_top_9000(input.as_str()).is_err());
    }

    #[test]
    fn missing_drawing_is_error() {
        assert!(get_stacks_and_moves("\nmove 1 from 1 to 2").is_err());
    }
}
