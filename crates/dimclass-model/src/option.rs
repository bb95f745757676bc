//! Input records supplied by the metadata loader.

use serde::{Deserialize, Serialize};

/// Globally unique identifier of a selectable dimension value (`nom_item_id`).
pub type OptionId = u64;

/// Identifies one dimension slot of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimensionKey {
    /// Dataset (matrix) code, e.g. `POP105A`.
    pub matrix_code: String,
    /// Dimension code within the dataset.
    pub dim_code: String,
}

impl DimensionKey {
    pub fn new(matrix_code: impl Into<String>, dim_code: impl Into<String>) -> Self {
        Self {
            matrix_code: matrix_code.into(),
            dim_code: dim_code.into(),
        }
    }
}

/// A dimension slot of a dataset together with its label.
///
/// Only the label matters for dispatch; the key groups options per dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDefinition {
    pub key: DimensionKey,
    pub label: String,
}

/// One `(dataset, dimension, option)` occurrence from the input stream.
///
/// `raw_label` is `None` when the source value could not be decoded; such an
/// occurrence is still classified (as unmatched) so the batch never aborts on
/// a single bad value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionOccurrence {
    pub option_id: OptionId,
    pub raw_label: Option<String>,
    pub dimension: DimensionDefinition,
}

impl OptionOccurrence {
    /// Builds a well-formed occurrence.
    pub fn new(
        option_id: OptionId,
        raw_label: impl Into<String>,
        dimension_label: impl Into<String>,
        matrix_code: impl Into<String>,
        dim_code: impl Into<String>,
    ) -> Self {
        Self {
            option_id,
            raw_label: Some(raw_label.into()),
            dimension: DimensionDefinition {
                key: DimensionKey::new(matrix_code, dim_code),
                label: dimension_label.into(),
            },
        }
    }

    pub fn matrix_code(&self) -> &str {
        &self.dimension.key.matrix_code
    }

    /// Returns true if the label could not be decoded from the source.
    pub fn is_malformed(&self) -> bool {
        self.raw_label.is_none()
    }
}
