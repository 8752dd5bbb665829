use crate::{
    error::{AppError, AppResult},
    models::{Catalog, ItemRecommendation, MovieId},
};

use super::{IdIndexMap, SimilarityMatrix};

/// Finds the `n` items most similar to `movie_id`
///
/// Positions are always translated through `items`; a matrix index is never
/// used as a movie id. The queried item is excluded by position, so another
/// item with similarity 1.0 is still returned.
pub fn recommend_for_item(
    item_similarity: &SimilarityMatrix,
    items: &IdIndexMap,
    catalog: &Catalog,
    movie_id: MovieId,
    n: usize,
) -> AppResult<Vec<ItemRecommendation>> {
    if item_similarity.len() != items.len() {
        return Err(AppError::StaleCacheMismatch(format!(
            "similarity matrix covers {} items, index map has {}",
            item_similarity.len(),
            items.len()
        )));
    }

    let target = items
        .index_of(movie_id)
        .ok_or(AppError::ItemNotFound(movie_id))?;

    let row = item_similarity.row(target);
    let mut ranked: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(idx, _)| *idx != target)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);

    ranked
        .into_iter()
        .enumerate()
        .map(|(pos, (idx, similarity))| {
            let id = items
                .id_at(idx)
                .ok_or_else(|| AppError::Internal(format!("No movie at index {}", idx)))?;
            let title = catalog
                .title(id)
                .ok_or_else(|| AppError::Internal(format!("Movie {} missing from catalog", id)))?;

            Ok(ItemRecommendation {
                rank: pos + 1,
                title: title.to_string(),
                similarity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use crate::services::cosine_similarity;
    use ndarray::array;

    /// Items 10, 20, 30, 40 in that canonical order
    fn fixture() -> (SimilarityMatrix, IdIndexMap, Catalog) {
        // Columns are items, rows are users
        let ratings = array![
            [5.0, 5.0, 0.0, 4.0],
            [4.0, 4.0, 1.0, 0.0],
            [0.0, 1.0, 5.0, 3.0],
        ];
        let similarity = cosine_similarity(ratings.t());
        let items = IdIndexMap::from_ids(vec![40, 10, 30, 20]);
        let catalog = Catalog::new(vec![
            Movie::new(10, "Alien", &[]),
            Movie::new(20, "Aliens", &[]),
            Movie::new(30, "Amelie", &[]),
            Movie::new(40, "Heat", &[]),
        ]);
        (similarity, items, catalog)
    }

    #[test]
    fn test_most_similar_first() {
        let (similarity, items, catalog) = fixture();

        let recs = recommend_for_item(&similarity, &items, &catalog, 10, 2).unwrap();

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].rank, 1);
        assert_eq!(recs[0].title, "Aliens");
        assert_eq!(recs[1].rank, 2);
        assert!(recs[0].similarity >= recs[1].similarity);
    }

    #[test]
    fn test_excludes_queried_item() {
        let (similarity, items, catalog) = fixture();

        for movie_id in [10, 20, 30, 40] {
            let own_title = catalog.title(movie_id).unwrap().to_string();
            let recs = recommend_for_item(&similarity, &items, &catalog, movie_id, 10).unwrap();

            assert_eq!(recs.len(), 3);
            assert!(recs.iter().all(|r| r.title != own_title));
            for pair in recs.windows(2) {
                assert!(pair[0].similarity >= pair[1].similarity);
            }
        }
    }

    #[test]
    fn test_titles_resolved_through_index_map() {
        // Movie ids far from their positions; a positional lookup would miss
        let ratings = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let similarity = cosine_similarity(ratings.t());
        let items = IdIndexMap::from_ids(vec![1000, 7]);
        let catalog = Catalog::new(vec![
            Movie::new(7, "Seven", &[]),
            Movie::new(1000, "Thousand", &[]),
        ]);

        let recs = recommend_for_item(&similarity, &items, &catalog, 7, 1).unwrap();

        assert_eq!(recs[0].title, "Thousand");
    }

    #[test]
    fn test_identical_twin_is_kept() {
        let ratings = array![[3.0, 3.0, 0.0], [2.0, 2.0, 5.0]];
        let similarity = cosine_similarity(ratings.t());
        let items = IdIndexMap::from_ids(vec![1, 2, 3]);
        let catalog = Catalog::new(vec![
            Movie::new(1, "Original", &[]),
            Movie::new(2, "Remake", &[]),
            Movie::new(3, "Other", &[]),
        ]);

        let recs = recommend_for_item(&similarity, &items, &catalog, 2, 1).unwrap();

        assert_eq!(recs[0].title, "Original");
        assert!((recs[0].similarity - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tied_similarity_keeps_canonical_order() {
        // Columns follow canonical order 5, 50, 70, 90; items 5 and 70 have
        // identical columns, so both tie against item 50
        let ratings = array![[4.0, 4.0, 4.0, 0.0], [0.0, 3.0, 0.0, 1.0]];
        let similarity = cosine_similarity(ratings.t());
        let items = IdIndexMap::from_ids(vec![90, 50, 5, 70]);
        let catalog = Catalog::new(vec![
            Movie::new(90, "Ninety", &[]),
            Movie::new(50, "Fifty", &[]),
            Movie::new(5, "Five", &[]),
            Movie::new(70, "Seventy", &[]),
        ]);

        let recs = recommend_for_item(&similarity, &items, &catalog, 50, 3).unwrap();

        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Five", "Seventy", "Ninety"]);
        assert_eq!(recs[0].similarity, recs[1].similarity);
        assert!(recs[1].similarity > recs[2].similarity);
    }

    #[test]
    fn test_unknown_item() {
        let (similarity, items, catalog) = fixture();

        let result = recommend_for_item(&similarity, &items, &catalog, 99, 3);

        assert!(matches!(result, Err(AppError::ItemNotFound(99))));
    }

    #[test]
    fn test_shape_mismatch_is_stale() {
        let (similarity, _, catalog) = fixture();
        let items = IdIndexMap::from_ids(vec![10, 20, 30]);

        let result = recommend_for_item(&similarity, &items, &catalog, 10, 3);

        assert!(matches!(result, Err(AppError::StaleCacheMismatch(_))));
    }

    #[test]
    fn test_n_zero() {
        let (similarity, items, catalog) = fixture();

        assert!(recommend_for_item(&similarity, &items, &catalog, 10, 0)
            .unwrap()
            .is_empty());
    }
}
