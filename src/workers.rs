//! Bounded OS-thread worker pool for the write and read pipelines.
//!
//! No async runtime, no thread-pool crate: tasks are plain
//! `std::thread::spawn` calls, joined in spawn order. This mirrors the
//! original's round-based `std::async` fan-out bounded by
//! `hardware_concurrency`.

use std::thread;

/// Number of workers to use when the caller doesn't override it.
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// One file successfully read and compressed, ready to be committed to the
/// index by the main thread.
pub struct PackedFile {
    pub name: String,
    pub blob: Vec<u8>,
    pub original_size: u32,
    pub compressed_size: u32,
}

/// Drive `items` through `task` in bounded rounds of `workers` threads.
/// Results are returned in the same order as `items`, with `None` standing
/// in for a file that failed to read/compress (and was therefore already
/// logged by `task`). The write path's index commit logic filters these
/// out so `position` stays monotonic over the kept entries.
pub fn run_write_pool<T, F>(items: &[T], workers: usize, task: F) -> Vec<Option<PackedFile>>
where
    T: Sync,
    F: Fn(&T) -> Option<PackedFile> + Send + Sync,
{
    let workers = workers.max(1);
    let mut results = Vec::with_capacity(items.len());
    thread::scope(|scope| {
        for round in items.chunks(workers) {
            let handles: Vec<_> = round.iter().map(|item| scope.spawn(|| task(item))).collect();
            for h in handles {
                results.push(h.join().expect("worker thread panicked"));
            }
        }
    });
    results
}

/// Partition `count` items into `workers` contiguous slices of size
/// `ceil(count/workers)`, returning `(start, end)` ranges. The last slice
/// may be shorter or empty.
pub fn partition_ranges(count: usize, workers: usize) -> Vec<(usize, usize)> {
    if count == 0 {
        return Vec::new();
    }
    let workers = workers.max(1);
    let per_worker = count.div_ceil(workers);
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < count {
        let end = (start + per_worker).min(count);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_covers_all_items_without_overlap() {
        for (count, workers) in [(10, 3), (1, 4), (0, 4), (7, 1), (100, 16)] {
            let ranges = partition_ranges(count, workers);
            let mut covered = 0;
            for (s, e) in &ranges {
                assert!(e >= s);
                covered += e - s;
            }
            assert_eq!(covered, count);
            for w in ranges.windows(2) {
                assert_eq!(w[0].1, w[1].0);
            }
        }
    }
}
