use crate::models::WinnerRecord;

/// Returns the bucket ordered by ascending global rank. The sort is stable,
/// so tied ranks keep fetch order, and unranked records go last.
pub fn rank(records: &[WinnerRecord]) -> Vec<WinnerRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by_key(|r| r.rank_key());
    ranked
}

/// [`rank`] truncated to the first `n` entries.
pub fn top_n(records: &[WinnerRecord], n: usize) -> Vec<WinnerRecord> {
    let mut ranked = rank(records);
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[WinnerRecord]) -> Vec<&str> {
        records.iter().map(|r| r.username.as_str()).collect()
    }

    #[test]
    fn test_rank_ascending_with_unranked_last() {
        let bucket = vec![
            WinnerRecord::new("five").with_rank(5),
            WinnerRecord::new("none"),
            WinnerRecord::new("one").with_rank(1),
            WinnerRecord::new("three").with_rank(3),
        ];

        let ranked = rank(&bucket);
        assert_eq!(names(&ranked), vec!["one", "three", "five", "none"]);
        assert!(ranked.windows(2).all(|w| w[0].rank_key() <= w[1].rank_key()));
        assert_eq!(names(&bucket), vec!["five", "none", "one", "three"]);
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let bucket = vec![
            WinnerRecord::new("first").with_rank(2),
            WinnerRecord::new("second").with_rank(1),
            WinnerRecord::new("third").with_rank(2),
        ];

        assert_eq!(names(&rank(&bucket)), vec!["second", "first", "third"]);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let bucket = vec![
            WinnerRecord::new("b").with_rank(9),
            WinnerRecord::new("a").with_rank(3),
            WinnerRecord::new("c").with_rank(3),
        ];

        let once = rank(&bucket);
        assert_eq!(rank(&once), once);
    }

    #[test]
    fn test_top_n() {
        let bucket: Vec<WinnerRecord> = (1..=5)
            .rev()
            .map(|i| WinnerRecord::new(format!("p{i}")).with_rank(i))
            .collect();

        assert_eq!(names(&top_n(&bucket, 3)), vec!["p1", "p2", "p3"]);
        assert_eq!(top_n(&bucket, 10).len(), 5);
        assert!(top_n(&[], 3).is_empty());
    }
}
