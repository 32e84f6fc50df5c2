//! 標準条項ごとの最良一致選択と判定

use crate::error::{Error, Result};
use crate::similarity::SimilarityMatrix;
use crate::types::{Classification, MatchResult, StandardClause, TenderItem};

/// 行の最大値とその列番号を返す
///
/// 同点の場合は先に現れた列を採用する。空行はNone。
pub fn best_match(row: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (j, &score) in row.iter().enumerate() {
        let better = match best {
            Some((_, current)) => score > current,
            None => !score.is_nan(),
        };
        if better {
            best = Some((j, score));
        }
    }
    best
}

/// 全標準条項を照合
///
/// 出力は `clauses` と同じ順序・同じ件数。入札項目が空の場合は全件 Conflict。
/// 行列の形が N×M でなければ `DimensionMismatch`。
pub fn match_clauses(
    clauses: &[StandardClause],
    items: &[TenderItem],
    matrix: &SimilarityMatrix,
) -> Result<Vec<MatchResult>> {
    if matrix.rows() != clauses.len() {
        return Err(Error::DimensionMismatch {
            expected: clauses.len(),
            actual: matrix.rows(),
        });
    }
    if !clauses.is_empty() && matrix.cols() != items.len() {
        return Err(Error::DimensionMismatch {
            expected: items.len(),
            actual: matrix.cols(),
        });
    }

    Ok(clauses
        .iter()
        .enumerate()
        .map(|(i, clause)| {
            if items.is_empty() {
                return MatchResult::unmatched(clause.clone());
            }
            match best_match(matrix.row(i)) {
                Some((j, score)) => MatchResult {
                    clause: clause.clone(),
                    best_tender_item: items.get(j).cloned(),
                    score,
                    classification: Classification::from_score(score),
                },
                None => MatchResult::unmatched(clause.clone()),
            }
        })
        .collect())
}
