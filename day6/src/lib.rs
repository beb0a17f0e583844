/// Ring buffer over the last `len` characters of a stream that keeps track
/// of how many of them are repeats.
#[derive(Debug, Clone)]
pub struct UniqueWindow {
    buffer: Vec<Option<char>>,
    idx: usize,
    seen: usize,
    // n identical characters count as n - 1 duplicates
    duplicates: usize,
}

impl UniqueWindow {
    pub fn new(len: usize) -> Self {
        Self {
            buffer: vec![None; len],
            idx: 0,
            seen: 0,
            duplicates: 0,
        }
    }

    fn count(&self, c: char) -> usize {
        self.buffer.iter().filter(|&&other| other == Some(c)).count()
    }

    pub fn push(&mut self, c: char) {
        if self.buffer.is_empty() {
            return;
        }

        if let Some(old) = self.buffer[self.idx].take() {
            if self.count(old) > 0 {
                self.duplicates -= 1;
            }
        }

        if self.count(c) > 0 {
            self.duplicates += 1;
        }

        self.buffer[self.idx] = Some(c);
        self.idx = (self.idx + 1) % self.buffer.len();
        self.seen += 1;
    }

    /// True once the window is full and holds no repeated character.
    pub fn is_unique(&self) -> bool {
        self.seen >= self.buffer.len() && self.duplicates == 0
    }
}

/// 1-based position of the character completing the first run of `n`
/// distinct characters.
pub fn marker_end(signal: &str, n: usize) -> Option<usize> {
    let mut window = UniqueWindow::new(n);
    if window.is_unique() {
        return Some(0);
    }

    signal
        .trim_end()
        .chars()
        .enumerate()
        .find_map(|(i, c)| {
            window.push(c);
            window.is_unique().then_some(i + 1)
        })
}
