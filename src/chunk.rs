use crate::types::Demand;

pub const DEFAULT_CHUNK_SIZE: usize = 8;

/// Splits demands into chunks of at most `chunk_size`, each pairing the
/// widest remaining demands with the narrowest ones so small pieces are
/// available to fill the gaps next to large ones.
///
/// Each chunk takes `chunk_size / 2` demands from the wide end and the rest
/// from the narrow end. Both halves keep descending-width order.
pub fn pair_chunks(demands: &[Demand], chunk_size: usize) -> Vec<Vec<Demand>> {
    let mut pool = demands.to_vec();
    pool.sort_by(|a, b| b.width.total_cmp(&a.width));

    if chunk_size == 0 {
        return if pool.is_empty() { vec![] } else { vec![pool] };
    }

    let head = chunk_size / 2;
    let tail = chunk_size - head;
    let mut chunks = Vec::new();

    while !pool.is_empty() {
        let mut chunk: Vec<Demand> = pool.drain(..head.min(pool.len())).collect();
        let start = pool.len().saturating_sub(tail);
        chunk.extend(pool.drain(start..));
        chunks.push(chunk);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn widths(chunk: &[Demand]) -> Vec<f64> {
        chunk.iter().map(|d| d.width).collect()
    }

    #[test]
    fn test_twenty_demands_chunk_eight() {
        // widths 20, 19, ..., 1
        let demands: Vec<Demand> = (1..=20).rev().map(|w| Demand::new(w as f64, 1)).collect();
        let chunks = pair_chunks(&demands, 8);
        assert_eq!(chunks.len(), 3);
        assert_eq!(
            widths(&chunks[0]),
            vec![20.0, 19.0, 18.0, 17.0, 4.0, 3.0, 2.0, 1.0]
        );
        assert_eq!(
            widths(&chunks[1]),
            vec![16.0, 15.0, 14.0, 13.0, 8.0, 7.0, 6.0, 5.0]
        );
        assert_eq!(widths(&chunks[2]), vec![12.0, 11.0, 10.0, 9.0]);
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        let demands = vec![
            Demand::new(3.0, 1),
            Demand::new(9.0, 1),
            Demand::new(1.0, 1),
            Demand::new(5.0, 1),
        ];
        let chunks = pair_chunks(&demands, 2);
        assert_eq!(widths(&chunks[0]), vec![9.0, 1.0]);
        assert_eq!(widths(&chunks[1]), vec![5.0, 3.0]);
    }

    #[rstest]
    #[case(1, vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0], vec![5.0]])]
    #[case(3, vec![vec![5.0, 2.0, 1.0], vec![4.0, 3.0]])]
    #[case(8, vec![vec![5.0, 4.0, 3.0, 2.0, 1.0]])]
    fn test_odd_and_oversized_chunks(#[case] size: usize, #[case] expected: Vec<Vec<f64>>) {
        let demands: Vec<Demand> = (1..=5).rev().map(|w| Demand::new(w as f64, 2)).collect();
        let chunks = pair_chunks(&demands, size);
        let got: Vec<Vec<f64>> = chunks.iter().map(|c| widths(c)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_empty() {
        assert!(pair_chunks(&[], 8).is_empty());
    }

    proptest! {
        #[test]
        fn prop_chunks_partition_demands(n in 0usize..40, size in 1usize..12) {
            let demands: Vec<Demand> = (0..n).map(|w| Demand::new(w as f64 + 1.0, 1)).collect();
            let chunks = pair_chunks(&demands, size);
            let total: usize = chunks.iter().map(Vec::len).sum();
            prop_assert_eq!(total, n);
            for c in &chunks {
                prop_assert!(!c.is_empty());
                prop_assert!(c.len() <= size);
            }
        }
    }
}
