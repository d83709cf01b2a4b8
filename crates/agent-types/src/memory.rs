use std::collections::VecDeque;

/// Bounded FIFO log of short strings the planner consults on each step.
///
/// Oldest entries are evicted once the cap is reached; `view()` renders the
/// remaining entries newline-joined in chronological order.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    cap: usize,
    items: VecDeque<String>,
}

impl Default for WorkingMemory {
    fn default() -> Self {
        Self::new(30)
    }
}

impl WorkingMemory {
    pub fn new(cap: usize) -> Self {
        Self { cap, items: VecDeque::new() }
    }

    pub fn add(&mut self, entry: impl AsRef<str>) {
        let trimmed = entry.as_ref().trim().to_string();
        self.items.push_back(trimmed);
        while self.items.len() > self.cap {
            self.items.pop_front();
        }
    }

    pub fn view(&self) -> String {
        self.items.iter().cloned().collect::<Vec<_>>().join("\n")
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace_on_add() {
        let mut m = WorkingMemory::default();
        m.add("  goto example.com  ");
        assert_eq!(m.view(), "goto example.com");
    }

    #[test]
    fn evicts_from_front_beyond_cap() {
        let mut m = WorkingMemory::new(3);
        for i in 0..5 {
            m.add(format!("entry {i}"));
        }
        assert_eq!(m.len(), 3);
        assert_eq!(m.view(), "entry 2\nentry 3\nentry 4");
    }

    #[test]
    fn thirty_first_insert_evicts_first() {
        let mut m = WorkingMemory::default();
        for i in 0..30 {
            m.add(format!("e{i}"));
        }
        assert!(m.view().starts_with("e0"));
        m.add("e30");
        assert!(!m.view().contains("e0\n") && !m.view().starts_with("e0"));
        assert!(m.view().starts_with("e1"));
        assert_eq!(m.len(), 30);
    }
}
