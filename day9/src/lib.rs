use std::{collections::HashSet, iter::repeat, str::FromStr};

use anyhow::{anyhow, Context, Result};

pub type Position = (i32, i32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    fn step(&self) -> Position {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    direction: Direction,
    len: usize,
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: [&str; 2] = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|v: Vec<_>| anyhow!("Wrong number of elements: {}", v.len()))?;
        let len = parts[1].parse().map_err(anyhow::Error::msg)?;
        let direction = match parts[0] {
            "L" => Direction::Left,
            "R" => Direction::Right,
            "U" => Direction::Up,
            "D" => Direction::Down,
            other => return Err(anyhow!("Unrecognized direction: {other}")),
        };

        Ok(Self { direction, len })
    }
}

/// Knot positions, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rope {
    knots: Vec<Position>,
}

impl Rope {
    pub fn new(knots: usize) -> Result<Self> {
        if knots == 0 {
            return Err(anyhow!("A rope needs at least one knot"));
        }

        Ok(Self {
            knots: vec![(0, 0); knots],
        })
    }

    pub fn head(&self) -> Position {
        self.knots[0]
    }

    pub fn tail(&self) -> Position {
        self.knots[self.knots.len() - 1]
    }

    /// Position `knot` moves to so that it keeps touching `leader`.
    fn follow(leader: Position, knot: Position) -> Position {
        let (dx, dy) = (leader.0 - knot.0, leader.1 - knot.1);

        if dx.abs() > 1 || dy.abs() > 1 {
            (knot.0 + dx.signum(), knot.1 + dy.signum())
        } else {
            knot
        }
    }

    /// Move the head one step and let the rest of the rope catch up.
    pub fn step(&mut self, direction: Direction) {
        let (dx, dy) = direction.step();
        self.knots[0].0 += dx;
        self.knots[0].1 += dy;

        for i in 1..self.knots.len() {
            let moved = Self::follow(self.knots[i - 1], self.knots[i]);
            if moved == self.knots[i] {
                // the knots further down can't move either
                break;
            }
            self.knots[i] = moved;
        }
    }
}

pub fn get_moves(input: &str) -> Result<Vec<Move>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| l.parse::<Move>().with_context(|| format!("line {}: {l:?}", i + 1)))
        .collect()
}

pub fn count_unique_tail_positions(input: &str, knots: usize) -> Result<usize> {
    let mut rope = Rope::new(knots)?;
    let mut visited = HashSet::from([rope.tail()]);

    for direction in get_moves(input)?
        .into_iter()
        .flat_map(|mv| repeat(mv.direction).take(mv.len))
    {
        rope.step(direction);
        visited.insert(rope.tail());
    }

    tracing::debug!(head = ?rope.head(), tail = ?rope.tail(), "final rope");

    Ok(visited.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_INPUT: &str = include_str!("../data/test_input");
    const TEST_INPUT_LARGE: &str = include_str!("../data/test_input_large");

    #[test]
    fn part1() {
        let res = count_unique_tail_positions(TEST_INPUT, 2);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 13);
    }

    #[test]
    fn part2() {
        let res = count_unique_tail_positions(TEST_INPUT, 10);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 1);
    }

    #[test]
    fn part2_large() {
        let res = count_unique_tail_positions(TEST_INPUT_LARGE, 10);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 36);
    }

    #[rstest]
    #[case((2, 0), (0, 0), (1, 0))]
    #[case((1, 1), (0, 0), (0, 0))]
    #[case((2, 1), (0, 0), (1, 1))]
    #[case((2, 2), (0, 0), (1, 1))]
    #[case((0, -2), (0, 0), (0, -1))]
    fn follow(#[case] leader: Position, #[case] knot: Position, #[case] expected: Position) {
        assert_eq!(Rope::follow(leader, knot), expected);
    }

    #[test]
    fn single_knot_rope() {
        assert_eq!(count_unique_tail_positions(TEST_INPUT, 1).unwrap(), 21);
    }

    #[rstest]
    #[case("X 3")]
    #[case("R")]
    #[case("R -1")]
    #[case("R 1 2")]
    fn bad_move_is_error(#[case] input: &str) {
        assert!(get_moves(input).is_err());
    }

    #[test]
    fn zero_knots_is_error() {
        assert!(count_unique_tail_positions(TEST_INPUT, 0).is_err());
    }
}
