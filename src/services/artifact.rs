use bytes::{Buf, BufMut, BytesMut};
use ndarray::Array2;

use crate::error::{AppError, AppResult};

use super::SimilarityMatrix;

const MAGIC: &[u8; 4] = b"CMSM";
pub const FORMAT_VERSION: u32 = 1;
const HEADER_LEN: usize = 4 + 4 + 8 + 8;

/// Persisted item similarity matrix with the identity of the data it came from
///
/// Layout (little-endian): magic, `format_version: u32`, `item_count: u64`,
/// `dataset_fingerprint: u64`, `item_ids: [i64; item_count]`,
/// `values: [f64; item_count * item_count]` row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityArtifact {
    pub dataset_fingerprint: u64,
    pub item_ids: Vec<i64>,
    pub similarity: SimilarityMatrix,
}

impl SimilarityArtifact {
    pub fn encode(&self) -> Vec<u8> {
        let count = self.item_ids.len();
        let mut buf = BytesMut::with_capacity(HEADER_LEN + count * 8 + count * count * 8);

        buf.put_slice(MAGIC);
        buf.put_u32_le(FORMAT_VERSION);
        buf.put_u64_le(count as u64);
        buf.put_u64_le(self.dataset_fingerprint);
        for id in &self.item_ids {
            buf.put_i64_le(*id);
        }
        for value in self.similarity.values().iter() {
            buf.put_f64_le(*value);
        }

        buf.to_vec()
    }

    pub fn decode(raw: &[u8]) -> AppResult<Self> {
        if raw.len() < HEADER_LEN {
            return Err(AppError::CorruptCache(format!(
                "artifact is {} bytes, shorter than its header",
                raw.len()
            )));
        }

        let mut buf = raw;
        let mut magic = [0u8; 4];
        buf.copy_to_slice(&mut magic);
        if &magic != MAGIC {
            return Err(AppError::CorruptCache("bad magic".to_string()));
        }

        let version = buf.get_u32_le();
        if version != FORMAT_VERSION {
            return Err(AppError::CorruptCache(format!(
                "unsupported format version {}",
                version
            )));
        }

        let count = usize::try_from(buf.get_u64_le())
            .map_err(|_| AppError::CorruptCache("item count overflows".to_string()))?;
        let dataset_fingerprint = buf.get_u64_le();

        let expected = count
            .checked_mul(count)
            .and_then(|cells| cells.checked_add(count))
            .and_then(|words| words.checked_mul(8));
        if expected != Some(buf.remaining()) {
            return Err(AppError::CorruptCache(format!(
                "payload is {} bytes, {} items need {:?}",
                buf.remaining(),
                count,
                expected
            )));
        }

        let item_ids: Vec<i64> = (0..count).map(|_| buf.get_i64_le()).collect();
        let values: Vec<f64> = (0..count * count).map(|_| buf.get_f64_le()).collect();

        let array = Array2::from_shape_vec((count, count), values)
            .map_err(|e| AppError::CorruptCache(e.to_string()))?;
        let similarity = SimilarityMatrix::from_array(array)
            .ok_or_else(|| AppError::CorruptCache("matrix is not square".to_string()))?;

        Ok(Self {
            dataset_fingerprint,
            item_ids,
            similarity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cosine_similarity;
    use ndarray::array;

    fn artifact() -> SimilarityArtifact {
        let ratings = array![[5.0, 0.0, 1.0], [3.0, 4.0, 0.0]];
        SimilarityArtifact {
            dataset_fingerprint: 0xDEAD_BEEF,
            item_ids: vec![3, 17, 256],
            similarity: cosine_similarity(ratings.t()),
        }
    }

    #[test]
    fn test_header_layout() {
        let raw = artifact().encode();

        assert_eq!(&raw[0..4], b"CMSM");
        assert_eq!(u32::from_le_bytes(raw[4..8].try_into().unwrap()), FORMAT_VERSION);
        assert_eq!(u64::from_le_bytes(raw[8..16].try_into().unwrap()), 3);
        assert_eq!(u64::from_le_bytes(raw[16..24].try_into().unwrap()), 0xDEAD_BEEF);
        assert_eq!(raw.len(), HEADER_LEN + 3 * 8 + 9 * 8);
    }

    #[test]
    fn test_decode_restores_artifact() {
        let original = artifact();

        let decoded = SimilarityArtifact::decode(&original.encode()).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let raw = artifact().encode();

        let result = SimilarityArtifact::decode(&raw[..raw.len() - 1]);
        assert!(matches!(result, Err(AppError::CorruptCache(_))));

        let result = SimilarityArtifact::decode(&raw[..10]);
        assert!(matches!(result, Err(AppError::CorruptCache(_))));
    }

    #[test]
    fn test_decode_rejects_headerless_matrix() {
        // Bare f64 dump with no header
        let raw: Vec<u8> = [1.0f64, 0.5, 0.5, 1.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();

        let result = SimilarityArtifact::decode(&raw);
        assert!(matches!(result, Err(AppError::CorruptCache(_))));
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut raw = artifact().encode();
        raw[4..8].copy_from_slice(&99u32.to_le_bytes());

        let result = SimilarityArtifact::decode(&raw);
        assert!(matches!(result, Err(AppError::CorruptCache(_))));
    }

    #[test]
    fn test_empty_artifact() {
        let empty = SimilarityArtifact {
            dataset_fingerprint: 1,
            item_ids: vec![],
            similarity: SimilarityMatrix::from_array(Array2::zeros((0, 0))).unwrap(),
        };

        let decoded = SimilarityArtifact::decode(&empty.encode()).unwrap();
        assert!(decoded.item_ids.is_empty());
        assert!(decoded.similarity.is_empty());
    }
}
