use anyhow::{anyhow, Context, Result};
use itertools::Itertools;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RucksackError {
    #[error("Not an item: {0:?}")]
    InvalidItem(char),

    #[error("Number of items is not divisible by 2: {0}")]
    OddItemCount(usize),

    #[error("Expected exactly one common item, found {0}")]
    NoSingleCommonItem(u32),
}

/// Priority of an item type: a-z are 1-26, A-Z are 27-52.
pub fn priority(item: char) -> Result<u32, RucksackError> {
    match item {
        'a'..='z' => Ok(item as u32 - 'a' as u32 + 1),
        'A'..='Z' => Ok(item as u32 - 'A' as u32 + 27),
        _ => Err(RucksackError::InvalidItem(item)),
    }
}

/// Set of item types, one bit per priority.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ItemSet(u64);

impl ItemSet {
    pub fn from_items(items: &str) -> Result<Self, RucksackError> {
        items.chars().try_fold(Self::default(), |mut set, item| {
            set.insert(item)?;
            Ok(set)
        })
    }

    pub fn insert(&mut self, item: char) -> Result<(), RucksackError> {
        self.0 |= 1u64 << priority(item)?;
        Ok(())
    }

    pub fn contains(&self, item: char) -> bool {
        priority(item).map_or(false, |p| self.0 & (1u64 << p) != 0)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0 & other.0)
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Priority of the only item type in the set.
    pub fn single_priority(&self) -> Result<u32, RucksackError> {
        match self.len() {
            1 => Ok(self.0.trailing_zeros()),
            n => Err(RucksackError::NoSingleCommonItem(n)),
        }
    }
}

fn shared_in_compartments(line: &str) -> Result<u32, RucksackError> {
    let priorities = line.chars().map(priority).collect::<Result<Vec<_>, _>>()?;
    if priorities.len() % 2 != 0 {
        return Err(RucksackError::OddItemCount(priorities.len()));
    }

    let (first, second) = priorities.split_at(priorities.len() / 2);
    let to_set = |half: &[u32]| ItemSet(half.iter().fold(0, |set, p| set | 1u64 << p));
    to_set(first).intersection(&to_set(second)).single_priority()
}

pub fn sum_shared_priorities(input: &str) -> Result<u32> {
    input
        .lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            shared_in_compartments(line).with_context(|| format!("line {}: {line}", i + 1))
        })
        .sum()
}

pub fn sum_badge_priorities(input: &str) -> Result<u32> {
    let rucksacks = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ItemSet::from_items)
        .collect::<Result<Vec<_>, _>>()?;

    if rucksacks.len() % 3 != 0 {
        return Err(anyhow!(
            "Number of rucksacks is not divisible by 3: {}",
            rucksacks.len()
        ));
    }

    rucksacks
        .into_iter()
        .tuples()
        .enumerate()
        .map(|(group, (r1, r2, r3))| {
            r1.intersection(&r2)
                .intersection(&r3)
                .single_priority()
                .with_context(|| format!("group {}", group + 1))
        })
        .sum()
}
