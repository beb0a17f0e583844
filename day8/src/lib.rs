use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use itertools::Itertools;

pub const MAX_TREE_HEIGHT: u8 = 9;

/// Tree heights, row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    heights: Vec<u8>,
}

impl FromStr for Grid {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();

        lines
            .iter()
            .map(|l| l.len())
            .all_equal()
            .then_some(())
            .context("Not all rows have the same length!")?;

        let heights = lines
            .iter()
            .flat_map(|l| l.chars())
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .ok_or_else(|| anyhow!("Not a tree height: {c:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        if heights.is_empty() {
            return Err(anyhow!("No trees in the grid!"));
        }

        Ok(Self {
            rows: lines.len(),
            cols: heights.len() / lines.len(),
            heights,
        })
    }
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn ind(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn height(&self, row: usize, col: usize) -> u8 {
        self.heights[self.ind(row, col)]
    }

    /// Every row and column, once from each end, as flat indices starting
    /// at the edge the view comes from.
    fn sight_lines(&self) -> Vec<Vec<usize>> {
        let rows = (0..self.rows).flat_map(|row| {
            let line = (0..self.cols).map(|col| self.ind(row, col)).collect_vec();
            let reversed = line.iter().rev().copied().collect_vec();
            [line, reversed]
        });
        let cols = (0..self.cols).flat_map(|col| {
            let line = (0..self.rows).map(|row| self.ind(row, col)).collect_vec();
            let reversed = line.iter().rev().copied().collect_vec();
            [line, reversed]
        });

        rows.chain(cols).collect()
    }

    /// Trees visible from at least one edge.
    pub fn count_visible(&self) -> usize {
        let mut visible = vec![false; self.heights.len()];

        for line in self.sight_lines() {
            let mut tallest = None;
            for ind in line {
                let height = self.heights[ind];
                if tallest.map_or(true, |tallest| height > tallest) {
                    visible[ind] = true;
                    tallest = Some(height);
                    if height == MAX_TREE_HEIGHT {
                        break;
                    }
                }
            }
        }

        visible.into_iter().filter(|&v| v).count()
    }

    fn viewing_distance(&self, row: usize, col: usize, (d_row, d_col): (isize, isize)) -> usize {
        let height = self.height(row, col);
        let (mut r, mut c) = (row as isize, col as isize);
        let mut distance = 0;

        loop {
            r += d_row;
            c += d_col;
            if r < 0 || c < 0 || r >= self.rows as isize || c >= self.cols as isize {
                break;
            }

            distance += 1;
            if self.height(r as usize, c as usize) >= height {
                break;
            }
        }

        distance
    }

    pub fn scenic_score(&self, row: usize, col: usize) -> usize {
        [(0, -1), (0, 1), (-1, 0), (1, 0)]
            .into_iter()
            .map(|dir| self.viewing_distance(row, col, dir))
            .product()
    }

    /// Walks from every tree in all four directions.
    pub fn best_scenic_score(&self) -> usize {
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .map(|(row, col)| self.scenic_score(row, col))
            .max()
            .unwrap_or(0)
    }

    /// One pass per sight line, remembering for every height how far back
    /// the last tree at least that tall was.
    pub fn best_scenic_score_sweep(&self) -> usize {
        let mut scores = vec![1; self.heights.len()];

        for line in self.sight_lines() {
            // edge trees see nothing in this direction
            let mut last_blocker = [0usize; MAX_TREE_HEIGHT as usize + 1];

            for ind in line {
                let height = self.heights[ind] as usize;
                scores[ind] *= last_blocker[height];

                for (h, distance) in last_blocker.iter_mut().enumerate() {
                    if h <= height {
                        *distance = 1;
                    } else {
                        *distance += 1;
                    }
                }
            }
        }

        scores.into_iter().max().unwrap_or(0)
    }
}

pub fn get_num_visible(input: &str) -> Result<usize> {
    Ok(input.parse::<Grid>()?.count_visible())
}

pub fn get_greatest_scenic_score(input: &str) -> Result<usize> {
    Ok(input.parse::<Grid>()?.best_scenic_score())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let res = get_num_visible(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 21);
    }

    #[test]
    fn part2() {
        let res = get_greatest_scenic_score(TEST_INPUT);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 8);
    }

    #[rstest]
    #[case(1, 2, 4)]
    #[case(3, 2, 8)]
    #[case(0, 0, 0)]
    fn scenic_score(#[case] row: usize, #[case] col: usize, #[case] expected: usize) {
        let grid: Grid = TEST_INPUT.parse().unwrap();
        assert_eq!(grid.scenic_score(row, col), expected);
    }

    #[rstest]
    #[case(TEST_INPUT)]
    #[case("900010009")]
    #[case("12\n34\n56")]
    #[case("1111\n1911\n1111")]
    fn sweep_matches_walk(#[case] input: &str) {
        let grid: Grid = input.parse().unwrap();
        assert_eq!(grid.best_scenic_score_sweep(), grid.best_scenic_score());
    }

    #[test]
    fn rectangular_grid() {
        let grid: Grid = "123\n456".parse().unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.count_visible(), 6);
    }

    #[test]
    fn single_tree() {
        let grid: Grid = "5".parse().unwrap();
        assert_eq!(grid.count_visible(), 1);
        assert_eq!(grid.best_scenic_score(), 0);
    }

    #[rstest]
    #[case("")]
    #[case("123\n45")]
    #[case("12a\n456")]
    fn bad_grid_is_error(#[case] input: &str) {
        assert!(input.parse::<Grid>().is_err());
    }
}
