//! 照合パイプラインの統合テスト
//!
//! 内蔵ハッシュ埋め込みで読み込み後の条項・項目を照合する。

use tender_compare::embedder::{EmbeddingCache, EmbeddingService, HashEmbedder};
use tender_compare::pipeline::{run_comparison, RunOptions};
use tender_compare_common::{
    compare, Classification, MatchField, StandardClause, TenderItem, NO_MATCH_SCORE,
};

fn options() -> RunOptions {
    RunOptions {
        match_on: MatchField::Text,
        verbose: false,
        show_progress: false,
    }
}

fn service() -> EmbeddingService {
    EmbeddingService::Hash(HashEmbedder::default())
}

/// 同一文は一致、無関係な項目は残余
#[tokio::test]
async fn test_identical_text_matches_and_unrelated_is_residual() {
    let clauses = vec![StandardClause::new(0, "C1", "Payment within 30 days")];
    let items = vec![
        TenderItem::new(0, "T1", "Payment within 30 days"),
        TenderItem::new(1, "T2", "Unrelated clause"),
    ];

    let report = run_comparison(&clauses, &items, &service(), None, options())
        .await
        .expect("照合失敗");

    assert_eq!(report.matches.len(), 1);
    let result = &report.matches[0];
    assert_eq!(result.best_tender_item.as_ref().unwrap().label, "T1");
    assert_eq!(result.classification, Classification::Match);
    assert!(result.score > 0.999);

    assert_eq!(report.residuals.len(), 1);
    assert_eq!(report.residuals[0].item.label, "T2");
    assert_eq!(report.residuals[0].annotation, "Not part of Standards");
}

/// 入札項目なしは全件 Conflict、残余なし
#[tokio::test]
async fn test_empty_tender_set() {
    let clauses = vec![
        StandardClause::new(0, "C1", "Payment within 30 days"),
        StandardClause::new(1, "C2", "Warranty of 12 months"),
    ];

    let report = run_comparison(&clauses, &[], &service(), None, options())
        .await
        .expect("照合失敗");

    assert_eq!(report.matches.len(), 2);
    for result in &report.matches {
        assert_eq!(result.classification, Classification::Conflict);
        assert_eq!(result.score, NO_MATCH_SCORE);
        assert!(result.best_tender_item.is_none());
    }
    assert!(report.residuals.is_empty());
}

/// 2つの条項が同じ項目を選んでも残余には入らない
#[tokio::test]
async fn test_two_clauses_share_single_item() {
    let clauses = vec![
        StandardClause::new(0, "C1", "Payment within 30 days"),
        StandardClause::new(1, "C2", "Retention of 5 percent"),
    ];
    let items = vec![TenderItem::new(0, "T1", "Payment within 45 days")];

    let report = run_comparison(&clauses, &items, &service(), None, options())
        .await
        .expect("照合失敗");

    assert_eq!(report.matches.len(), 2);
    assert!(report
        .matches
        .iter()
        .all(|r| r.best_tender_item.as_ref().map(|t| t.id) == Some(0)));
    assert!(report.residuals.is_empty());
}

/// 同じ入力なら同じ結果
#[tokio::test]
async fn test_deterministic_runs() {
    let clauses: Vec<_> = [
        "Payment within 30 days",
        "Performance bank guarantee of 10 percent",
        "Liquidated damages capped at 5 percent",
    ]
    .iter()
    .enumerate()
    .map(|(i, t)| StandardClause::new(i, format!("C{}", i + 1), *t))
    .collect();
    let items: Vec<_> = [
        "Bank guarantee 10% of contract value",
        "Payment 45 days from invoice",
        "Site visit mandatory",
        "LD maximum 10 percent",
    ]
    .iter()
    .enumerate()
    .map(|(j, t)| TenderItem::new(j, format!("T{}", j + 1), *t))
    .collect();

    let first = run_comparison(&clauses, &items, &service(), None, options()).await.unwrap();
    let second = run_comparison(&clauses, &items, &service(), None, options()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.matches.len(), clauses.len());

    for item in &items {
        let chosen = first
            .matches
            .iter()
            .any(|r| r.best_tender_item.as_ref().map(|t| t.id) == Some(item.id));
        let residual = first.residuals.iter().any(|r| r.item.id == item.id);
        assert!(chosen != residual, "項目{}の扱いが不正", item.label);
    }
}

/// キャッシュ使用時も結果は同じ
#[tokio::test]
async fn test_cached_run_matches_uncached() {
    let clauses = vec![StandardClause::new(0, "C1", "Payment within 30 days")];
    let items = vec![
        TenderItem::new(0, "T1", "Payment within 30 days"),
        TenderItem::new(1, "T2", "Warranty 12 months"),
    ];
    let mut cache = EmbeddingCache::default();

    let cached = run_comparison(&clauses, &items, &service(), Some(&mut cache), options())
        .await
        .unwrap();
    let plain = run_comparison(&clauses, &items, &service(), None, options())
        .await
        .unwrap();

    assert_eq!(cached, plain);
    // 同一文は1件にまとまる
    assert_eq!(cache.len(), 2);
}

/// 共通ライブラリの同期APIでも同じ結果
#[test]
fn test_sync_compare_with_hash_embedder() {
    let clauses = vec![StandardClause::new(0, "Payment Terms", "Within 30 days")];
    let items = vec![
        TenderItem::new(0, "Warranty", "12 months"),
        TenderItem::new(1, "Payment Terms", "Within 30 days"),
    ];

    let report = compare(&clauses, &items, &HashEmbedder::default(), MatchField::Combined)
        .expect("照合失敗");

    assert_eq!(report.matches[0].best_tender_item.as_ref().unwrap().id, 1);
    assert_eq!(report.matches[0].classification, Classification::Match);
    assert_eq!(report.residuals.len(), 1);
    assert_eq!(report.residuals[0].item.label, "Warranty");
}
