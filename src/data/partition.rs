// ============================================================
// Layer 4 — Partition Batcher
// ============================================================
// Groups a stream of items into batches whose members share a
// partition key, e.g. all paragraph instances of one question.
//
// Items with the same key are expected to be contiguous (that is
// how Question::paragraph_instances lays them out). A batch is
// closed when:
//   - the key changes,
//   - the stream ends, or
//   - it already holds `max_instances_in_memory` items.
//
// Example with key = first letter, max = 3:
//   a1 a2 b1 b2 b3 b4 a3
//   → [a1 a2] [b1 b2 b3] [b4] [a3]
//
// Only one batch is ever buffered, so memory use is bounded by
// max_instances_in_memory regardless of the input size.

use std::{iter::Peekable, marker::PhantomData};

pub struct PartitionBatches<I, F, K>
where
    I: Iterator,
{
    items:     Peekable<I>,
    key_fn:    F,
    max_items: usize,
    _key:      PhantomData<fn() -> K>,
}

impl<I, F, K> PartitionBatches<I, F, K>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    /// # Panics
    /// Panics if max_instances_in_memory is 0.
    pub fn new(items: I, max_instances_in_memory: usize, key_fn: F) -> Self {
        assert!(max_instances_in_memory > 0, "max_instances_in_memory must be positive");
        Self {
            items:     items.peekable(),
            key_fn,
            max_items: max_instances_in_memory,
            _key:      PhantomData,
        }
    }
}

impl<I, F, K> Iterator for PartitionBatches<I, F, K>
where
    I: Iterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.items.next()?;
        let key   = (self.key_fn)(&first);
        let mut batch = vec![first];

        while batch.len() < self.max_items {
            let same_key = match self.items.peek() {
                Some(next) => (self.key_fn)(next) == key,
                None => false,
            };
            if !same_key {
                break;
            }
            if let Some(item) = self.items.next() {
                batch.push(item);
            }
        }

        if batch.len() == self.max_items {
            tracing::debug!("Partition batch hit the {} item limit", self.max_items);
        }
        Some(batch)
    }
}

/// Convenience constructor: `partition_batches(iter, 32, |x| x.key)`.
pub fn partition_batches<I, F, K>(
    items: I,
    max_instances_in_memory: usize,
    key_fn: F,
) -> PartitionBatches<I::IntoIter, F, K>
where
    I: IntoIterator,
    F: FnMut(&I::Item) -> K,
    K: PartialEq,
{
    PartitionBatches::new(items.into_iter(), max_instances_in_memory, key_fn)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::{Paragraphs, Question};
    use crate::domain::token::Token;

    /// Keys 0..5 where key i appears i + 1 times, the whole run twice:
    /// 0, 1 1, 2 2 2, 3 3 3 3, 4 4 4 4 4, 0, 1 1, ...
    fn keyed_items() -> Vec<(usize, usize)> {
        let mut items = Vec::new();
        for _ in 0..2 {
            for key in 0..5 {
                for n in 0..=key {
                    items.push((key, n));
                }
            }
        }
        items
    }

    #[test]
    fn test_batches_follow_key_runs() {
        let batches: Vec<_> = partition_batches(keyed_items(), 6, |item| item.0).collect();
        let sizes: Vec<usize> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![1, 2, 3, 4, 5, 1, 2, 3, 4, 5]);
        assert!(batches.iter().all(|b| b.iter().all(|item| item.0 == b[0].0)));
    }

    #[test]
    fn test_limit_splits_long_runs() {
        let items = vec!["a1", "a2", "b1", "b2", "b3", "b4", "a3"];
        let batches: Vec<_> = partition_batches(items, 3, |s| s.as_bytes()[0]).collect();
        assert_eq!(
            batches,
            vec![vec!["a1", "a2"], vec!["b1", "b2", "b3"], vec!["b4"], vec!["a3"]]
        );
    }

    #[test]
    fn test_no_items_lost() {
        let total: usize = partition_batches(keyed_items(), 2, |item| item.0)
            .map(|b| b.len())
            .sum();
        assert_eq!(total, keyed_items().len());
    }

    #[test]
    fn test_empty_input() {
        let mut batches = partition_batches(Vec::<u8>::new(), 4, |x| *x);
        assert!(batches.next().is_none());
    }

    #[test]
    fn test_groups_paragraph_instances_by_question() {
        let question = |id: &str, n: usize| {
            let mut paragraphs = Paragraphs::default();
            for i in 0..n {
                paragraphs.push(format!("p{i}"), vec![Token::new(format!("p{i}"), 0)], vec![]);
            }
            Question {
                id:           id.to_string(),
                text:         "q".to_string(),
                tokens:       vec![Token::new("q", 0)],
                paragraphs,
                answer_texts: vec![],
            }
        };

        let instances = [question("qw_1", 3), question("qw_2", 2)]
            .iter()
            .flat_map(Question::paragraph_instances)
            .collect::<Vec<_>>();

        let batches: Vec<_> =
            partition_batches(instances, 16, |inst| inst.question_id.clone()).collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[1][0].question_id, "qw_2");
    }

    #[test]
    #[should_panic]
    fn test_zero_limit_panics() {
        let _ = partition_batches(vec![1], 0, |x| *x);
    }
}
