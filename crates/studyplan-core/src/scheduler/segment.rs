//! Splitting a task's study time into Pomodoro-sized sessions.

/// Split `total_minutes` into consecutive sessions of at most `max_chunk`
/// minutes.
///
/// Every session but the last is exactly `max_chunk` long; the last one
/// absorbs the remainder. The lengths always sum to `total_minutes`.
/// A total of zero yields no sessions. A `max_chunk` of zero disables
/// splitting and yields the whole total as one session.
pub fn segment_duration(total_minutes: u32, max_chunk: u32) -> Vec<u32> {
    if total_minutes == 0 {
        return Vec::new();
    }
    if max_chunk == 0 {
        return vec![total_minutes];
    }

    let full = (total_minutes / max_chunk) as usize;
    let remainder = total_minutes % max_chunk;

    let mut sessions = vec![max_chunk; full];
    if remainder > 0 {
        sessions.push(remainder);
    }
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_with_trailing_remainder() {
        assert_eq!(segment_duration(90, 25), vec![25, 25, 25, 15]);
    }

    #[test]
    fn even_split_has_no_remainder_chunk() {
        assert_eq!(segment_duration(75, 25), vec![25, 25, 25]);
    }

    #[test]
    fn short_total_is_single_chunk() {
        assert_eq!(segment_duration(10, 25), vec![10]);
        assert_eq!(segment_duration(25, 25), vec![25]);
    }

    #[test]
    fn zero_total_is_empty() {
        assert!(segment_duration(0, 25).is_empty());
    }

    #[test]
    fn zero_chunk_keeps_total_whole() {
        assert_eq!(segment_duration(40, 0), vec![40]);
    }
}
