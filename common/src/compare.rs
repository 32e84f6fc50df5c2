//! 照合の入口
//!
//! 埋め込み → 類似度行列 → 条項ごとの判定 → 残余項目 を1回で実行する。

use crate::embedding::{validate_embeddings, Embedder};
use crate::error::Result;
use crate::matcher::match_clauses;
use crate::residual::find_residuals;
use crate::similarity::SimilarityMatrix;
use crate::types::{ComparisonReport, MatchField, StandardClause, TenderItem};

/// 埋め込みプロバイダを使って照合する
///
/// 入札項目が空の場合は埋め込みを呼ばずに全件 Conflict を返す。
/// 埋め込み呼び出しはリストごとに1回だけ。
pub fn compare(
    clauses: &[StandardClause],
    items: &[TenderItem],
    embedder: &dyn Embedder,
    match_on: MatchField,
) -> Result<ComparisonReport> {
    if clauses.is_empty() || items.is_empty() {
        return compare_embeddings(clauses, items, &[], &[]);
    }

    let clause_vectors = embedder.embed(&match_on.clause_texts(clauses))?;
    let item_vectors = embedder.embed(&match_on.item_texts(items))?;

    compare_embeddings(clauses, items, &clause_vectors, &item_vectors)
}

/// 計算済みベクトルから照合する（I/Oなし）
///
/// どちらかのリストが空の場合、ベクトルは参照しない。
pub fn compare_embeddings(
    clauses: &[StandardClause],
    items: &[TenderItem],
    clause_vectors: &[Vec<f32>],
    item_vectors: &[Vec<f32>],
) -> Result<ComparisonReport> {
    let matrix = if clauses.is_empty() || items.is_empty() {
        SimilarityMatrix::from_rows(vec![Vec::new(); clauses.len()])?
    } else {
        validate_embeddings(clause_vectors, clauses.len(), None)?;
        let dimension = clause_vectors.first().map(|v| v.len());
        validate_embeddings(item_vectors, items.len(), dimension)?;
        SimilarityMatrix::compute(clause_vectors, item_vectors)?
    };

    let matches = match_clauses(clauses, items, &matrix)?;
    let residuals = find_residuals(&matches, items);

    Ok(ComparisonReport { matches, residuals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{Classification, NO_MATCH_SCORE};
    use std::cell::Cell;
    use std::collections::HashMap;

    /// テキスト→ベクトルの固定表を返すスタブ
    struct StubEmbedder {
        table: HashMap<String, Vec<f32>>,
        calls: Cell<usize>,
    }

    impl StubEmbedder {
        fn new(entries: &[(&str, Vec<f32>)]) -> Self {
            Self {
                table: entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl Embedder for StubEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.set(self.calls.get() + 1);
            texts
                .iter()
                .map(|t| {
                    self.table
                        .get(t)
                        .cloned()
                        .ok_or_else(|| Error::Embedding(format!("unknown text: {}", t)))
                })
                .collect()
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(Error::Embedding("provider down".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn clause(id: usize, label: &str, text: &str) -> StandardClause {
        StandardClause::new(id, label, text)
    }

    fn item(id: usize, label: &str, text: &str) -> TenderItem {
        TenderItem::new(id, label, text)
    }

    #[test]
    fn test_scenario_identical_text_matches() {
        let embedder = StubEmbedder::new(&[
            ("Payment within 30 days", vec![0.6, 0.8, 0.0]),
            ("Unrelated clause", vec![0.0, 0.0, 1.0]),
        ]);
        let clauses = vec![clause(0, "C1", "Payment within 30 days")];
        let items = vec![
            item(0, "T1", "Payment within 30 days"),
            item(1, "T2", "Unrelated clause"),
        ];

        let report = compare(&clauses, &items, &embedder, MatchField::Text).unwrap();

        assert_eq!(report.matches.len(), 1);
        let result = &report.matches[0];
        assert_eq!(result.best_tender_item.as_ref().unwrap().label, "T1");
        assert_eq!(result.classification, Classification::Match);
        assert!((result.score - 1.0).abs() < 1e-6);
        assert_eq!(report.residuals.len(), 1);
        assert_eq!(report.residuals[0].item.label, "T2");
        assert_eq!(embedder.calls.get(), 2);
    }

    #[test]
    fn test_scenario_empty_tender_set() {
        let clauses = vec![clause(0, "C1", "a"), clause(1, "C2", "b")];
        let report = compare(&clauses, &[], &FailingEmbedder, MatchField::Text).unwrap();

        assert_eq!(report.matches.len(), 2);
        assert!(report
            .matches
            .iter()
            .all(|r| r.classification == Classification::Conflict
                && r.score == NO_MATCH_SCORE
                && r.best_tender_item.is_none()));
        assert!(report.residuals.is_empty());
    }

    #[test]
    fn test_scenario_two_clauses_share_one_item() {
        let embedder = StubEmbedder::new(&[
            ("late fee", vec![1.0, 0.1]),
            ("penalty for delay", vec![0.9, 0.3]),
            ("liquidated damages", vec![1.0, 0.2]),
        ]);
        let clauses = vec![clause(0, "C1", "late fee"), clause(1, "C2", "penalty for delay")];
        let items = vec![item(0, "T1", "liquidated damages")];

        let report = compare(&clauses, &items, &embedder, MatchField::Text).unwrap();

        assert_eq!(report.matches.len(), 2);
        for r in &report.matches {
            assert_eq!(r.best_tender_item.as_ref().unwrap().id, 0);
        }
        assert!(report.residuals.is_empty());
    }

    #[test]
    fn test_scenario_boundary_score_needs_clarification() {
        let clauses = vec![clause(0, "C1", "x")];
        let items = vec![item(0, "T1", "y")];
        let matrix = SimilarityMatrix::from_rows(vec![vec![0.85]]).unwrap();
        let matches = match_clauses(&clauses, &items, &matrix).unwrap();
        assert_eq!(matches[0].classification, Classification::NeedsClarification);
    }

    #[test]
    fn test_unnormalised_vectors_still_match() {
        let clauses = vec![clause(0, "C1", "x"), clause(1, "C2", "y")];
        let items = vec![item(0, "T1", "x"), item(1, "T2", "y")];
        let clause_vectors = vec![vec![1e20, 0.0], vec![0.0, 1e-25]];
        let item_vectors = vec![vec![1e20, 0.0], vec![0.0, 1e-25]];

        let report = compare_embeddings(&clauses, &items, &clause_vectors, &item_vectors).unwrap();

        for (i, r) in report.matches.iter().enumerate() {
            assert_eq!(r.best_tender_item.as_ref().unwrap().id, i);
            assert_eq!(r.classification, Classification::Match);
            assert!((r.score - 1.0).abs() < 1e-6);
        }
        assert!(report.residuals.is_empty());
    }

    #[test]
    fn test_tie_prefers_first_tender_item() {
        let clauses = vec![clause(0, "C1", "x")];
        let items = vec![item(0, "T1", "y"), item(1, "T2", "y2"), item(2, "T3", "y3")];
        let clause_vectors = vec![vec![1.0, 0.0]];
        let item_vectors = vec![vec![0.0, 1.0], vec![2.0, 0.0], vec![3.0, 0.0]];

        let report = compare_embeddings(&clauses, &items, &clause_vectors, &item_vectors).unwrap();

        assert_eq!(report.matches[0].best_tender_item.as_ref().unwrap().label, "T2");
        let residual_labels: Vec<_> = report.residuals.iter().map(|r| r.item.label.as_str()).collect();
        assert_eq!(residual_labels, vec!["T1", "T3"]);
    }

    #[test]
    fn test_deterministic_and_total() {
        let clauses: Vec<_> = (0..5).map(|i| clause(i, &format!("C{}", i), "c")).collect();
        let items: Vec<_> = (0..4).map(|j| item(j, &format!("T{}", j), "t")).collect();
        let clause_vectors: Vec<Vec<f32>> = (0..5)
            .map(|i| vec![i as f32 + 1.0, (5 - i) as f32, 0.5])
            .collect();
        let item_vectors: Vec<Vec<f32>> = (0..4)
            .map(|j| vec![(j * 2) as f32, 1.0, j as f32])
            .collect();

        let first = compare_embeddings(&clauses, &items, &clause_vectors, &item_vectors).unwrap();
        let second = compare_embeddings(&clauses, &items, &clause_vectors, &item_vectors).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.matches.len(), clauses.len());

        // 全入札項目は最良一致か残余のどちらかに必ず入る
        for t in &items {
            let is_best = first
                .matches
                .iter()
                .any(|r| r.best_tender_item.as_ref().map(|b| b.id) == Some(t.id));
            let is_residual = first.residuals.iter().any(|r| r.item.id == t.id);
            assert!(is_best ^ is_residual, "tender item {} misplaced", t.id);
        }
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let clauses = vec![clause(0, "C1", "a")];
        let items = vec![item(0, "T1", "b")];
        let err = compare(&clauses, &items, &FailingEmbedder, MatchField::Text).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_wrong_vector_count_is_error() {
        let clauses = vec![clause(0, "C1", "a"), clause(1, "C2", "b")];
        let items = vec![item(0, "T1", "b")];
        let err = compare_embeddings(&clauses, &items, &[vec![1.0]], &[vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::EmbeddingCount { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_mismatched_dimensions_between_lists() {
        let clauses = vec![clause(0, "C1", "a")];
        let items = vec![item(0, "T1", "b")];
        let err = compare_embeddings(&clauses, &items, &[vec![1.0, 0.0]], &[vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn test_match_on_label() {
        let embedder = StubEmbedder::new(&[
            ("Payment Terms", vec![1.0, 0.0]),
            ("Terms of Payment", vec![0.99, 0.05]),
            ("Warranty", vec![0.0, 1.0]),
        ]);
        let clauses = vec![clause(0, "Payment Terms", "30 days")];
        let items = vec![item(0, "Warranty", "12 months"), item(1, "Terms of Payment", "45 days")];

        let report = compare(&clauses, &items, &embedder, MatchField::Label).unwrap();

        assert_eq!(report.matches[0].best_tender_item.as_ref().unwrap().id, 1);
        assert_eq!(report.matches[0].classification, Classification::Match);
    }
}
