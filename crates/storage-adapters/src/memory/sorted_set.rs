//! Score-ordered set of post ids with Redis-compatible range and rank rules.

use std::cmp::Ordering;

use domains::{Direction, PostId};

#[derive(Debug, Clone, Copy)]
struct Entry {
    score: f64,
    member: PostId,
}

/// Members ordered by ascending score. Equal scores are ordered by the
/// member's decimal form, which is how Redis breaks ties.
#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    entries: Vec<Entry>,
}

fn compare(a: &Entry, b: &Entry) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.member.to_string().cmp(&b.member.to_string()))
}

impl SortedSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `member` or moves it to its new score.
    pub fn upsert(&mut self, member: PostId, score: f64) {
        self.remove(member);
        let entry = Entry { score, member };
        let at = self
            .entries
            .binary_search_by(|probe| compare(probe, &entry))
            .unwrap_or_else(|insert_at| insert_at);
        self.entries.insert(at, entry);
    }

    fn remove(&mut self, member: PostId) -> bool {
        match self.entries.iter().position(|e| e.member == member) {
            Some(at) => {
                self.entries.remove(at);
                true
            }
            None => false,
        }
    }

    /// 0-based rank of `member` walking in `direction`.
    pub fn rank(&self, member: PostId, direction: Direction) -> Option<u64> {
        let at = self.entries.iter().position(|e| e.member == member)?;
        let rank = match direction {
            Direction::Forward => at,
            Direction::Reverse => self.entries.len() - 1 - at,
        };
        Some(rank as u64)
    }

    /// Inclusive slice `[start, stop]`; negative offsets count from the end.
    pub fn range(&self, start: i64, stop: i64, direction: Direction) -> Vec<PostId> {
        let len = self.entries.len() as i64;
        let start = if start < 0 { start + len } else { start }.max(0);
        let stop = if stop < 0 { stop + len } else { stop }.min(len - 1);
        if len == 0 || start > stop || start >= len {
            return Vec::new();
        }

        let (start, stop) = (start as usize, stop as usize);
        match direction {
            Direction::Forward => self.entries[start..=stop]
                .iter()
                .map(|e| e.member)
                .collect(),
            Direction::Reverse => self
                .entries
                .iter()
                .rev()
                .skip(start)
                .take(stop - start + 1)
                .map(|e| e.member)
                .collect(),
        }
    }
}
