use std::{collections::VecDeque, mem, str::FromStr};

use anyhow::{Context, Result};
use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, multispace0, space0, space1},
    combinator::{cut, map},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use nom_supreme::error::ErrorTree;
use thiserror::Error;
use util::{parse_number, parse_with_report, Span};

type ParseResult<'a, T> = IResult<Span<'a>, T, ErrorTree<Span<'a>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpRhs {
    Int(u64),
    Old,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Multiply(OpRhs),
    Add(OpRhs),
}

impl Operation {
    /// Result of the operation modulo `modulus`, for `old < modulus`.
    fn apply_modulo(&self, old: u64, modulus: u64) -> u64 {
        let old = u128::from(old);
        let rhs = |operand: OpRhs| match operand {
            OpRhs::Int(y) => u128::from(y),
            OpRhs::Old => old,
        };
        let new = match *self {
            Operation::Multiply(y) => old * rhs(y),
            Operation::Add(y) => old + rhs(y),
        };

        (new % u128::from(modulus)) as u64
    }

    fn apply(&self, old: u64) -> Option<u64> {
        match *self {
            Operation::Multiply(OpRhs::Int(y)) => old.checked_mul(y),
            Operation::Multiply(OpRhs::Old) => old.checked_mul(old),
            Operation::Add(OpRhs::Int(y)) => old.checked_add(y),
            Operation::Add(OpRhs::Old) => old.checked_add(old),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Test {
    divisible_by: u64,
    true_pass_to: usize,
    false_pass_to: usize,
}

impl Test {
    fn target(&self, worry_lvl: u64) -> usize {
        if worry_lvl % self.divisible_by == 0 {
            self.true_pass_to
        } else {
            self.false_pass_to
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monkey {
    id: usize,
    items: VecDeque<u64>,
    operation: Operation,
    test: Test,
    inspections: usize,
}

impl Monkey {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn items(&self) -> &VecDeque<u64> {
        &self.items
    }

    pub fn inspections(&self) -> usize {
        self.inspections
    }
}

fn parse_starting_items(i: Span) -> ParseResult<VecDeque<u64>> {
    map(
        preceded(
            pair(tag("Starting items:"), space0),
            separated_list0(pair(char(','), space0), parse_number),
        ),
        |items: Vec<u64>| VecDeque::from(items),
    )(i)
}

fn parse_op_rhs(i: Span) -> ParseResult<OpRhs> {
    alt((
        map(tag("old"), |_| OpRhs::Old),
        map(parse_number, OpRhs::Int),
    ))(i)
}

fn parse_operation(i: Span) -> ParseResult<Operation> {
    preceded(
        pair(tag("Operation: new = old"), space1),
        alt((
            map(preceded(pair(char('*'), space1), parse_op_rhs), Operation::Multiply),
            map(preceded(pair(char('+'), space1), parse_op_rhs), Operation::Add),
        )),
    )(i)
}

fn parse_test(i: Span) -> ParseResult<Test> {
    map(
        tuple((
            preceded(tag("Test: divisible by "), parse_number),
            preceded(
                pair(multispace0, tag("If true: throw to monkey ")),
                parse_number,
            ),
            preceded(
                pair(multispace0, tag("If false: throw to monkey ")),
                parse_number,
            ),
        )),
        |(divisible_by, true_pass_to, false_pass_to)| Test {
            divisible_by,
            true_pass_to,
            false_pass_to,
        },
    )(i)
}

fn parse_monkey(i: Span) -> ParseResult<Monkey> {
    preceded(
        pair(multispace0, tag("Monkey ")),
        cut(map(
            tuple((
                terminated(parse_number, char(':')),
                preceded(multispace0, parse_starting_items),
                preceded(multispace0, parse_operation),
                preceded(multispace0, parse_test),
            )),
            |(id, items, operation, test)| Monkey {
                id,
                items,
                operation,
                test,
                inspections: 0,
            },
        )),
    )(i)
}

fn parse_monkeys(i: Span) -> ParseResult<Vec<Monkey>> {
    delimited(space0, many0(parse_monkey), multispace0)(i)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TroopError {
    #[error("Monkeys are not listed in order: expected {expected}, found {found}")]
    OutOfOrder { expected: usize, found: usize },

    #[error("Monkey {monkey} throws to nonexisting monkey {target}")]
    UnknownTarget { monkey: usize, target: usize },

    #[error("Monkey {0} throws to itself")]
    ThrowsToSelf(usize),

    #[error("Monkey {0} tests divisibility by zero")]
    DivisibleByZero(usize),

    #[error("No monkeys")]
    Empty,

    #[error("Worry level overflowed while monkey {0} inspected an item")]
    Overflow(usize),
}

/// How worry levels are kept small after every inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorryRelief {
    /// Worry drops by this factor after the monkey gets bored.
    Divide(u64),
    /// No relief: worry is only reduced modulo the common multiple of all
    /// divisibility tests, which keeps every test outcome unchanged. Falls
    /// back to `Residues` when that multiple is too large.
    None,
    /// No relief: every item tracks its worry modulo each monkey's divisor.
    Residues,
}

#[derive(Debug, Clone, Copy)]
enum Reduce {
    Divide(u64),
    Modulo(u64),
}

/// All monkeys, indexed by their id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Troop {
    monkeys: Vec<Monkey>,
}

impl FromStr for Troop {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let monkeys = parse_with_report(s, parse_monkeys)?;
        Ok(Self::new(monkeys)?)
    }
}

impl Troop {
    pub fn new(monkeys: Vec<Monkey>) -> Result<Self, TroopError> {
        if monkeys.is_empty() {
            return Err(TroopError::Empty);
        }

        for (expected, monkey) in monkeys.iter().enumerate() {
            if monkey.id != expected {
                return Err(TroopError::OutOfOrder {
                    expected,
                    found: monkey.id,
                });
            }
            if monkey.test.divisible_by == 0 {
                return Err(TroopError::DivisibleByZero(monkey.id));
            }

            for target in [monkey.test.true_pass_to, monkey.test.false_pass_to] {
                if target == monkey.id {
                    return Err(TroopError::ThrowsToSelf(monkey.id));
                }
                if target >= monkeys.len() {
                    return Err(TroopError::UnknownTarget {
                        monkey: monkey.id,
                        target,
                    });
                }
            }
        }

        Ok(Self { monkeys })
    }

    pub fn monkeys(&self) -> &[Monkey] {
        &self.monkeys
    }

    /// Least common multiple of all divisibility tests, `None` if it does
    /// not fit in a `u64`.
    pub fn common_multiple(&self) -> Option<u64> {
        self.monkeys
            .iter()
            .map(|m| m.test.divisible_by)
            .try_fold(1u64, |lcm, d| (lcm / num::integer::gcd(lcm, d)).checked_mul(d))
    }

    fn play_round(&mut self, reduce: Reduce) -> Result<(), TroopError> {
        for i in 0..self.monkeys.len() {
            let items = mem::take(&mut self.monkeys[i].items);
            let Monkey {
                operation, test, ..
            } = self.monkeys[i];
            self.monkeys[i].inspections += items.len();

            for worry_lvl in items {
                let worry_lvl = operation
                    .apply(worry_lvl)
                    .ok_or(TroopError::Overflow(i))?;
                let worry_lvl = match reduce {
                    Reduce::Divide(factor) => worry_lvl / factor,
                    Reduce::Modulo(lcm) => worry_lvl % lcm,
                };

                self.monkeys[test.target(worry_lvl)]
                    .items
                    .push_back(worry_lvl);
            }
        }

        Ok(())
    }

    fn play_reduced(&mut self, rounds: usize, reduce: Reduce) -> Result<(), TroopError> {
        tracing::debug!(?reduce, rounds, "starting simulation");

        for round in 0..rounds {
            self.play_round(reduce)?;
            tracing::trace!(
                round = round + 1,
                inspections = ?self.monkeys.iter().map(Monkey::inspections).collect_vec(),
                "round done"
            );
        }

        Ok(())
    }

    /// Every item carries its worry level modulo the divisor of each monkey,
    /// so no level ever grows past the largest divisor.
    ///
    /// Afterwards each item is stored as its residue modulo the divisor of
    /// the monkey holding it.
    fn play_residues(&mut self, rounds: usize) {
        tracing::debug!(rounds, "starting simulation with per-monkey residues");

        let divisors = self
            .monkeys
            .iter()
            .map(|m| m.test.divisible_by)
            .collect_vec();
        let mut held = self
            .monkeys
            .iter_mut()
            .map(|m| {
                mem::take(&mut m.items)
                    .into_iter()
                    .map(|worry_lvl| divisors.iter().map(|d| worry_lvl % d).collect_vec())
                    .collect::<VecDeque<_>>()
            })
            .collect_vec();

        for _ in 0..rounds {
            for i in 0..self.monkeys.len() {
                let items = mem::take(&mut held[i]);
                let Monkey {
                    operation, test, ..
                } = self.monkeys[i];
                self.monkeys[i].inspections += items.len();

                for mut residues in items {
                    for (residue, &d) in residues.iter_mut().zip(&divisors) {
                        *residue = operation.apply_modulo(*residue, d);
                    }
                    held[test.target(residues[i])].push_back(residues);
                }
            }
        }

        for (i, (monkey, items)) in self.monkeys.iter_mut().zip(held).enumerate() {
            monkey.items = items.into_iter().map(|residues| residues[i]).collect();
        }
    }

    pub fn play(&mut self, rounds: usize, relief: WorryRelief) -> Result<(), TroopError> {
        match relief {
            WorryRelief::Divide(factor) => self.play_reduced(rounds, Reduce::Divide(factor.max(1))),
            WorryRelief::Residues => {
                self.play_residues(rounds);
                Ok(())
            }
            WorryRelief::None => {
                // a reduced level below the lcm is squared by `old * old`
                match self.common_multiple().filter(|lcm| lcm.checked_mul(*lcm).is_some()) {
                    Some(lcm) => self.play_reduced(rounds, Reduce::Modulo(lcm)),
                    None => {
                        self.play_residues(rounds);
                        Ok(())
                    }
                }
            }
        }
    }

    /// Product of the two highest inspection counts, `None` on overflow.
    pub fn monkey_business(&self) -> Option<u64> {
        self.monkeys
            .iter()
            .map(|m| m.inspections as u64)
            .sorted_unstable()
            .rev()
            .take(2)
            .try_fold(1u64, |product, n| product.checked_mul(n))
    }
}

pub fn get_monkey_business(input: &str, rounds: usize, relief: WorryRelief) -> Result<u64> {
    let mut troop: Troop = input.parse()?;
    troop
        .play(rounds, relief)
        .with_context(|| format!("simulating {rounds} rounds"))?;

    troop
        .monkey_business()
        .context("Monkey business level overflows")
}
