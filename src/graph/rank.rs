use crate::graph::{InvertedMap, RankMap};
use std::cmp::Reverse;

/// Reduces an inverted map to inbound-link counts
///
/// `rank[u] == inverted[u].len()`; URLs nobody links to are absent, which
/// means rank 0.
pub fn reduce(inverted: &InvertedMap) -> RankMap {
    inverted
        .iter()
        .map(|(target, sources)| (target.clone(), sources.len()))
        .collect()
}

/// The `n` highest-ranked URLs, ties broken by URL
pub fn top_ranked(ranks: &RankMap, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(&String, &usize)> = ranks.iter().collect();
    ranked.sort_by_key(|(url, rank)| (Reverse(**rank), *url));
    ranked
        .into_iter()
        .take(n)
        .map(|(url, rank)| (url.clone(), *rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::link_map;

    #[test]
    fn test_reduce_scenario() {
        let inverted = link_map(&[("p2", &["p1"]), ("p3", &["p1", "p2"])]);
        let ranks = reduce(&inverted);

        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks["p2"], 1);
        assert_eq!(ranks["p3"], 2);
    }

    #[test]
    fn test_reduce_empty() {
        assert!(reduce(&InvertedMap::new()).is_empty());
    }

    #[test]
    fn test_top_ranked_orders_by_rank_then_url() {
        let ranks: RankMap = [("b", 2), ("a", 2), ("c", 5), ("d", 1)]
            .into_iter()
            .map(|(url, rank)| (url.to_string(), rank))
            .collect();

        assert_eq!(
            top_ranked(&ranks, 3),
            vec![
                ("c".to_string(), 5),
                ("a".to_string(), 2),
                ("b".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_top_ranked_more_than_available() {
        let ranks: RankMap = [("only".to_string(), 1)].into_iter().collect();
        assert_eq!(top_ranked(&ranks, 10).len(), 1);
    }
}
