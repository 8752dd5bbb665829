use crate::{
    error::{AppError, AppResult},
    models::{ScoredItem, UserId},
};

use super::{cosine_similarity, RatingMatrix};

/// Recommends unseen items for a user by k-nearest-neighbour voting
///
/// Algorithm:
/// 1. Compute user-user cosine similarity over the whole matrix
/// 2. Take the `k` most similar other users (ties keep row order)
/// 3. An item qualifies for a neighbour when the target's cell is `0.0` and
///    the neighbour's rating exceeds the target's mean rating
/// 4. `score[item] = sum of similarity(target, neighbour)` over qualifying
///    neighbours
/// 5. Rank by score (ties keep column order), keep `n`, divide by `k`
///
/// The mean is taken over the target's entire row, zero-filled cells
/// included. Items no neighbour qualified are never returned.
pub fn recommend_for_user(
    matrix: &RatingMatrix,
    user_id: UserId,
    n: usize,
    k: usize,
) -> AppResult<Vec<ScoredItem>> {
    if k == 0 {
        return Err(AppError::InvalidInput(
            "Number of similar users (k) must be at least 1".to_string(),
        ));
    }

    let target = matrix
        .users()
        .index_of(user_id)
        .ok_or(AppError::UserNotFound(user_id))?;

    let values = matrix.values();
    let user_similarity = cosine_similarity(values.view());

    let target_row = values.row(target);
    let mean_rating = target_row.sum() / target_row.len() as f64;

    let mut neighbours: Vec<usize> = (0..values.nrows()).filter(|&u| u != target).collect();
    neighbours.sort_by(|&a, &b| {
        user_similarity
            .get(target, b)
            .total_cmp(&user_similarity.get(target, a))
    });
    neighbours.truncate(k);

    let mut scores = vec![0.0; values.ncols()];
    let mut qualified = vec![false; values.ncols()];

    for &neighbour in &neighbours {
        let similarity = user_similarity.get(target, neighbour);
        let neighbour_row = values.row(neighbour);

        for (item, (&own, &theirs)) in target_row.iter().zip(neighbour_row.iter()).enumerate() {
            if own == 0.0 && theirs > mean_rating {
                scores[item] += similarity;
                qualified[item] = true;
            }
        }
    }

    let mut ranked: Vec<(usize, f64)> = scores
        .into_iter()
        .enumerate()
        .filter(|(item, _)| qualified[*item])
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    tracing::debug!(
        user_id,
        neighbours = neighbours.len(),
        mean_rating,
        candidates = ranked.len(),
        "Scored user-based candidates"
    );

    let recommendations = ranked
        .into_iter()
        .take(n)
        .enumerate()
        .filter_map(|(pos, (item, score))| {
            matrix.items().id_at(item).map(|movie_id| ScoredItem {
                rank: pos + 1,
                movie_id,
                score: score / k as f64,
            })
        })
        .collect();

    Ok(recommendations)
}
