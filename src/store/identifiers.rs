//! Positional image-identifier table

use std::path::Path;

use safetensors::SafeTensors;

use super::{u32_values, u64_values};
use crate::error::{Error, Result};

/// Tensor name for the flat identifier character codes
pub const DEFAULT_CODES_TENSOR: &str = "image_ids";

/// Tensor name for the N+1 row offsets into the code tensor
pub const DEFAULT_OFFSETS_TENSOR: &str = "image_ids_offsets";

/// Ordered array of image identifiers, positionally aligned 1:1 with the
/// embedding matrix — row index is the only join key.
///
/// The on-disk layout is ragged: one flat U32 tensor of character codes and a
/// U64 offset tensor of length N+1 delimiting each row's slice. Every code is
/// a Unicode scalar; a row decodes to the concatenation of its codes. The
/// whole table decodes eagerly, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierTable {
    ids: Vec<String>,
}

impl IdentifierTable {
    /// Build a table from already-decoded identifiers
    pub fn from_ids(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Load and decode the table under the default tensor names
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_named(path, DEFAULT_CODES_TENSOR, DEFAULT_OFFSETS_TENSOR)
    }

    /// Load and decode the table under explicit tensor names
    pub fn load_named(
        path: impl AsRef<Path>,
        codes_name: &str,
        offsets_name: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            Error::Corruption(format!(
                "failed to read identifier table {}: {e}",
                path.display()
            ))
        })?;
        let container = SafeTensors::deserialize(&data).map_err(|e| {
            Error::Corruption(format!(
                "malformed identifier table {}: {e}",
                path.display()
            ))
        })?;

        let codes_view = container.tensor(codes_name).map_err(|e| {
            Error::Corruption(format!(
                "identifier table {} has no tensor '{codes_name}': {e}",
                path.display()
            ))
        })?;
        let offsets_view = container.tensor(offsets_name).map_err(|e| {
            Error::Corruption(format!(
                "identifier table {} has no tensor '{offsets_name}': {e}",
                path.display()
            ))
        })?;

        let codes = u32_values(&codes_view, "identifier codes")?;
        let offsets = u64_values(&offsets_view, "identifier offsets")?;
        Ok(Self {
            ids: decode_rows(&codes, &offsets)?,
        })
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier at `index`, if in range
    pub fn get(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    /// Iterate identifiers in positional order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Re-persist as the cleaner companion format: a flat JSON string array
    pub fn save_flat(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string(&self.ids)
            .map_err(|e| Error::Serialization(format!("identifier JSON encoding failed: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a flat JSON string array written by [`save_flat`](Self::save_flat)
    pub fn load_flat(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Corruption(format!(
                "failed to read identifier table {}: {e}",
                path.display()
            ))
        })?;
        let ids: Vec<String> = serde_json::from_str(&json)
            .map_err(|e| Error::Serialization(format!("identifier JSON decoding failed: {e}")))?;
        Ok(Self { ids })
    }
}

/// Decode ragged rows: `offsets[i]..offsets[i+1]` delimits row i's codes.
fn decode_rows(codes: &[u32], offsets: &[u64]) -> Result<Vec<String>> {
    if offsets.is_empty() {
        return Err(Error::Corruption(
            "identifier offsets tensor is empty".to_string(),
        ));
    }
    if offsets[0] != 0 {
        return Err(Error::Corruption(format!(
            "identifier offsets must start at 0, got {}",
            offsets[0]
        )));
    }
    let total = *offsets.last().unwrap_or(&0);
    if total != codes.len() as u64 {
        return Err(Error::Corruption(format!(
            "identifier offsets end at {total} but code tensor holds {} codes",
            codes.len()
        )));
    }

    let mut ids = Vec::with_capacity(offsets.len() - 1);
    for window in offsets.windows(2) {
        let (start, end) = (window[0], window[1]);
        if end < start || end > codes.len() as u64 {
            return Err(Error::Corruption(format!(
                "identifier offsets not monotone: {start}..{end} over {} codes",
                codes.len()
            )));
        }
        let row = &codes[start as usize..end as usize];
        let id: String = row
            .iter()
            .map(|&code| {
                char::from_u32(code).ok_or_else(|| {
                    Error::Corruption(format!("invalid character code {code} in identifier"))
                })
            })
            .collect::<Result<String>>()?;
        ids.push(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use safetensors::tensor::{Dtype, TensorView};

    fn write_table(path: &Path, ids: &[&str]) {
        let mut codes: Vec<u32> = Vec::new();
        let mut offsets: Vec<u64> = vec![0];
        for id in ids {
            codes.extend(id.chars().map(|c| c as u32));
            offsets.push(codes.len() as u64);
        }
        let code_bytes: Vec<u8> = codes.iter().flat_map(|v| v.to_le_bytes()).collect();
        let offset_bytes: Vec<u8> = offsets.iter().flat_map(|v| v.to_le_bytes()).collect();
        let tensors = vec![
            (
                DEFAULT_CODES_TENSOR,
                TensorView::new(Dtype::U32, vec![codes.len()], &code_bytes).unwrap(),
            ),
            (
                DEFAULT_OFFSETS_TENSOR,
                TensorView::new(Dtype::U64, vec![offsets.len()], &offset_bytes).unwrap(),
            ),
        ];
        safetensors::serialize_to_file(tensors, &None, path).unwrap();
    }

    #[test]
    fn test_load_decodes_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.safetensors");
        write_table(&path, &["100.jpg", "200.jpg", "x.png"]);

        let table = IdentifierTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(0), Some("100.jpg"));
        assert_eq!(table.get(2), Some("x.png"));
        assert_eq!(table.get(3), None);
        let collected: Vec<&str> = table.iter().collect();
        assert_eq!(collected, vec!["100.jpg", "200.jpg", "x.png"]);
    }

    #[test]
    fn test_empty_rows_decode_to_empty_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.safetensors");
        write_table(&path, &["", "a.jpg"]);

        let table = IdentifierTable::load(&path).unwrap();
        assert_eq!(table.get(0), Some(""));
        assert_eq!(table.get(1), Some("a.jpg"));
    }

    #[test]
    fn test_missing_file_is_corruption() {
        let err = IdentifierTable::load("/nonexistent/ids.safetensors").unwrap_err();
        assert!(matches!(err, Error::Corruption(_)));
    }

    #[test]
    fn test_bad_offsets_rejected() {
        // offsets ending past the code tensor
        let codes: Vec<u32> = vec![97, 98];
        let offsets: Vec<u64> = vec![0, 5];
        assert!(matches!(
            decode_rows(&codes, &offsets),
            Err(Error::Corruption(_))
        ));

        // offsets not starting at zero
        let offsets: Vec<u64> = vec![1, 2];
        assert!(matches!(
            decode_rows(&codes, &offsets),
            Err(Error::Corruption(_))
        ));

        // non-monotone offsets that still end at the code count
        let offsets: Vec<u64> = vec![0, 5, 2];
        assert!(matches!(
            decode_rows(&codes, &offsets),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_invalid_scalar_rejected() {
        // 0xD800 is a surrogate, not a Unicode scalar
        let codes: Vec<u32> = vec![0xD800];
        let offsets: Vec<u64> = vec![0, 1];
        assert!(matches!(
            decode_rows(&codes, &offsets),
            Err(Error::Corruption(_))
        ));
    }

    #[test]
    fn test_flat_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.json");

        let table =
            IdentifierTable::from_ids(vec!["a.jpg".to_string(), "b.jpg".to_string()]);
        table.save_flat(&path).unwrap();

        let reloaded = IdentifierTable::load_flat(&path).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn test_flat_json_is_a_plain_string_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.json");
        IdentifierTable::from_ids(vec!["a.jpg".to_string()])
            .save_flat(&path)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, r#"["a.jpg"]"#);
    }
}
