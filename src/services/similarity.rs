use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Square, symmetric pairwise similarity matrix
///
/// Row/column `i` corresponds to vector `i` of the input it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Array2<f64>,
}

impl SimilarityMatrix {
    /// Wraps precomputed values; `None` unless the array is square
    pub fn from_array(values: Array2<f64>) -> Option<Self> {
        if values.nrows() != values.ncols() {
            return None;
        }
        Some(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}

/// Pairwise cosine similarity between the rows of `vectors`
///
/// `sim(i, j) = dot(v_i, v_j) / (|v_i| * |v_j|)`, or `0.0` when either vector
/// is all zeros. The diagonal is `1.0` for non-zero vectors and `0.0` otherwise.
/// Pass `matrix.t()` to compare columns instead of rows.
pub fn cosine_similarity(vectors: ArrayView2<'_, f64>) -> SimilarityMatrix {
    let n = vectors.nrows();
    let norms: Vec<f64> = vectors
        .axis_iter(Axis(0))
        .map(|v| v.dot(&v).sqrt())
        .collect();

    let mut values = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        if norms[i] == 0.0 {
            continue;
        }
        values[[i, i]] = 1.0;

        let v_i = vectors.row(i);
        for j in (i + 1)..n {
            if norms[j] == 0.0 {
                continue;
            }
            let sim = (v_i.dot(&vectors.row(j)) / (norms[i] * norms[j])).clamp(-1.0, 1.0);
            values[[i, j]] = sim;
            values[[j, i]] = sim;
        }
    }

    SimilarityMatrix { values }
}
