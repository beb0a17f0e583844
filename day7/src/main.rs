use anyhow::Result;
use day7::{size_smallest, size_to_delete};
use util::Part;

const MAX_SMALL_DIR: u64 = 100000;
const DISK_SIZE: u64 = 70000000;
const NEEDED_SPACE: u64 = 30000000;

fn solve(input: &str, part: Part) -> Result<String> {
    Ok(match part {
        Part::First => format!(
            "Total directory sizes with max size {MAX_SMALL_DIR}: {}",
            size_smallest(input, MAX_SMALL_DIR)?
        ),
        Part::Second => format!(
            "Size of directory to delete: {}",
            size_to_delete(input, DISK_SIZE, NEEDED_SPACE)?
        ),
    })
}

fn main() {
    util::run(solve);
}
