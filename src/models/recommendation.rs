use serde::{Deserialize, Serialize};

use super::MovieId;

/// Engine-level recommendation: a ranked movie id with its normalized score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    /// 1-based position in the result list
    pub rank: usize,
    pub movie_id: MovieId,
    pub score: f64,
}

/// User-based recommendation returned to the client
///
/// Field names on the wire follow the public recommendations API
/// (`number`, `title`, `recommendation_score`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecommendation {
    #[serde(rename = "number")]
    pub rank: usize,
    pub title: String,
    #[serde(rename = "recommendation_score")]
    pub score: f64,
}

/// Item-based recommendation returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecommendation {
    #[serde(rename = "number")]
    pub rank: usize,
    pub title: String,
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_recommendation_wire_names() {
        let rec = UserRecommendation {
            rank: 1,
            title: "Toy Story (1995)".to_string(),
            score: 0.25,
        };

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["number"], 1);
        assert_eq!(json["title"], "Toy Story (1995)");
        assert_eq!(json["recommendation_score"], 0.25);
    }

    #[test]
    fn test_item_recommendation_wire_names() {
        let rec = ItemRecommendation {
            rank: 2,
            title: "Heat (1995)".to_string(),
            similarity: 0.5,
        };

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["number"], 2);
        assert_eq!(json["similarity"], 0.5);
    }
}
