//! 残余項目（どの標準条項にも選ばれなかった入札項目）の抽出

use crate::types::{MatchResult, ResidualTenderItem, TenderItem};
use std::collections::HashSet;

/// 最良一致として一度も選ばれなかった入札項目を元の順序で返す
pub fn find_residuals(results: &[MatchResult], items: &[TenderItem]) -> Vec<ResidualTenderItem> {
    let matched: HashSet<usize> = results
        .iter()
        .filter_map(|r| r.best_tender_item.as_ref().map(|t| t.id))
        .collect();

    items
        .iter()
        .filter(|item| !matched.contains(&item.id))
        .cloned()
        .map(ResidualTenderItem::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Classification, StandardClause};

    fn result_for(item: Option<&TenderItem>) -> MatchResult {
        MatchResult {
            clause: StandardClause::new(0, "C", "c"),
            best_tender_item: item.cloned(),
            score: 0.9,
            classification: Classification::Match,
        }
    }

    fn items() -> Vec<TenderItem> {
        vec![
            TenderItem::new(0, "T1", "a"),
            TenderItem::new(1, "T2", "b"),
            TenderItem::new(2, "T3", "c"),
        ]
    }

    #[test]
    fn test_residuals_keep_order() {
        let items = items();
        let results = vec![result_for(Some(&items[1]))];
        let residuals = find_residuals(&results, &items);
        let labels: Vec<_> = residuals.iter().map(|r| r.item.label.as_str()).collect();
        assert_eq!(labels, vec!["T1", "T3"]);
    }

    #[test]
    fn test_residuals_shared_best_match() {
        let items = items();
        let results = vec![result_for(Some(&items[0])), result_for(Some(&items[0]))];
        let residuals = find_residuals(&results, &items);
        assert_eq!(residuals.len(), 2);
        assert!(residuals.iter().all(|r| r.item.id != 0));
    }

    #[test]
    fn test_residuals_all_matched() {
        let items = items();
        let results: Vec<_> = items.iter().map(|t| result_for(Some(t))).collect();
        assert!(find_residuals(&results, &items).is_empty());
    }

    #[test]
    fn test_residuals_empty_inputs() {
        assert!(find_residuals(&[], &[]).is_empty());
        assert!(find_residuals(&[result_for(None)], &[]).is_empty());
        assert_eq!(find_residuals(&[], &items()).len(), 3);
    }
}
