use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::map,
    sequence::{preceded, separated_pair},
    IResult,
};
use nom_supreme::error::ErrorTree;
use thiserror::Error;
use util::{parse_number, parse_with_report, Span};

pub const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalLine<'a> {
    Cd(&'a str),
    Ls,
    Dir(&'a str),
    File { name: &'a str, size: u64 },
}

fn parse_name(i: Span) -> IResult<Span, &str, ErrorTree<Span>> {
    map(take_while1(|c: char| !c.is_whitespace()), |name: Span| {
        *name.fragment()
    })(i)
}

fn parse_line(i: Span) -> IResult<Span, TerminalLine, ErrorTree<Span>> {
    alt((
        map(preceded(tag("$ cd "), parse_name), TerminalLine::Cd),
        map(tag("$ ls"), |_| TerminalLine::Ls),
        map(preceded(tag("dir "), parse_name), TerminalLine::Dir),
        map(
            separated_pair(parse_number, char(' '), parse_name),
            |(size, name)| TerminalLine::File { name, size },
        ),
    ))(i)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Unable to go up from root directory")]
    AboveRoot,
}

#[derive(Debug, Clone, Default)]
struct Directory {
    parent: Option<usize>,
    children: BTreeMap<String, usize>,
    files: BTreeMap<String, u64>,
}

/// Directory tree stored as an arena. Children always get a higher index
/// than their parent.
#[derive(Debug, Clone)]
pub struct FileSystem {
    dirs: Vec<Directory>,
}

impl Default for FileSystem {
    fn default() -> Self {
        Self {
            dirs: vec![Directory::default()],
        }
    }
}

impl FileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Enter `name` below `dir`, creating it if it was never listed.
    pub fn child(&mut self, dir: usize, name: &str) -> usize {
        if let Some(&child) = self.dirs[dir].children.get(name) {
            return child;
        }

        let child = self.dirs.len();
        self.dirs.push(Directory {
            parent: Some(dir),
            ..Directory::default()
        });
        self.dirs[dir].children.insert(name.to_string(), child);
        child
    }

    pub fn parent(&self, dir: usize) -> Result<usize, NavigationError> {
        self.dirs[dir].parent.ok_or(NavigationError::AboveRoot)
    }

    /// Listing the same file twice does not count it twice.
    pub fn add_file(&mut self, dir: usize, name: &str, size: u64) {
        self.dirs[dir].files.insert(name.to_string(), size);
    }

    /// Size of every directory including everything below it, by index.
    pub fn total_sizes(&self) -> Vec<u64> {
        let mut sizes = self
            .dirs
            .iter()
            .map(|dir| dir.files.values().sum())
            .collect::<Vec<u64>>();

        for (i, dir) in self.dirs.iter().enumerate().skip(1).rev() {
            if let Some(parent) = dir.parent {
                sizes[parent] += sizes[i];
            }
        }

        sizes
    }

    pub fn total_size(&self, dir: usize) -> u64 {
        let d = &self.dirs[dir];
        d.files.values().sum::<u64>()
            + d.children
                .values()
                .map(|&child| self.total_size(child))
                .sum::<u64>()
    }

    pub fn from_transcript(input: &str) -> Result<Self> {
        let mut fs = Self::new();
        let mut cwd = ROOT;

        for (i, line) in input.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let parsed = parse_with_report(line, parse_line)
                .with_context(|| format!("line {}", i + 1))?;

            match parsed {
                TerminalLine::Cd("/") => cwd = ROOT,
                TerminalLine::Cd("..") => {
                    cwd = fs.parent(cwd).with_context(|| format!("line {}", i + 1))?
                }
                TerminalLine::Cd(name) => {
                    cwd = fs.child(cwd, name);
                    tracing::trace!(name, cwd, "moving down");
                }
                TerminalLine::Ls => {}
                TerminalLine::Dir(name) => {
                    fs.child(cwd, name);
                }
                TerminalLine::File { name, size } => fs.add_file(cwd, name, size),
            }
        }

        tracing::debug!(dirs = fs.len(), "parsed file system");

        Ok(fs)
    }
}

/// Sum of the sizes of all directories of at most `max_size`.
pub fn size_smallest(input: &str, max_size: u64) -> Result<u64> {
    let fs = FileSystem::from_transcript(input)?;

    Ok(fs
        .total_sizes()
        .into_iter()
        .filter(|&size| size <= max_size)
        .sum())
}

/// Size of the smallest directory whose deletion leaves `needed` free space
/// on a disk of `total`.
pub fn size_to_delete(input: &str, total: u64, needed: u64) -> Result<u64> {
    let fs = FileSystem::from_transcript(input)?;
    let sizes = fs.total_sizes();

    let used = sizes[ROOT];
    let free = total
        .checked_sub(used)
        .ok_or_else(|| anyhow!("Used {used} is more than total {total}"))?;

    let Some(to_free) = needed.checked_sub(free).filter(|&to_free| to_free > 0) else {
        return Ok(0);
    };

    tracing::debug!(used, free, to_free, "looking for a directory to delete");

    sizes
        .into_iter()
        .filter(|&size| size >= to_free)
        .min()
        .ok_or_else(|| anyhow!("No directory frees {to_free}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_INPUT: &str = include_str!("../data/test_input");

    #[test]
    fn part1() {
        let res = size_smallest(TEST_INPUT, 100000);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 95437);
    }

    #[test]
    fn part2() {
        let res = size_to_delete(TEST_INPUT, 70000000, 30000000);
        assert!(res.is_ok());
        assert_eq!(res.unwrap(), 24933642);
    }

    #[test]
    fn total_sizes_match_recursive() {
        let fs = FileSystem::from_transcript(TEST_INPUT).unwrap();
        let sizes = fs.total_sizes();
        assert_eq!(sizes[ROOT], 48381165);
        for dir in 0..fs.len() {
            assert_eq!(sizes[dir], fs.total_size(dir));
        }
    }

    #[test]
    fn repeated_listing_counted_once() {
        let input = "$ cd /\n$ ls\n100 a\n$ ls\n100 a\n50 b";
        assert_eq!(size_smallest(input, 1000).unwrap(), 150);
    }

    #[test]
    fn enough_space_already() {
        assert_eq!(size_to_delete(TEST_INPUT, 100000000, 30000000).unwrap(), 0);
    }

    #[test]
    fn up_from_root_is_error() {
        let res = FileSystem::from_transcript("$ cd /\n$ cd ..");
        assert!(res.is_err());
    }

    #[test]
    fn unknown_line_is_error() {
        let res = FileSystem::from_transcript("$ cd /\n$ rm -rf a");
        assert!(res.is_err());
    }

    fn parse(l: &str) -> TerminalLine<'_> {
        parse_with_report(l, parse_line).unwrap()
    }

    #[test]
    fn parse_lines() {
        assert_eq!(parse("$ cd .."), TerminalLine::Cd(".."));
        assert_eq!(parse("$ ls"), TerminalLine::Ls);
        assert_eq!(parse("dir e"), TerminalLine::Dir("e"));
        assert_eq!(
            parse("62596 h.lst"),
            TerminalLine::File {
                name: "h.lst",
                size: 62596
            }
        );
    }
}
