//! Record rearrangement
//!
//! Pure reorderings over stored records. Inputs are never mutated; callers receive new
//! vectors they can write back.

use indexmap::IndexMap;
use tcg_core::NormalizedRecord;

/// Group records by (module, submodule), groups in first-appearance order
///
/// Order inside each group is preserved. Keys compare case-insensitively after trimming.
#[must_use]
pub fn group_by_module(records: &[NormalizedRecord]) -> Vec<NormalizedRecord> {
    let mut groups: IndexMap<(String, String), Vec<NormalizedRecord>> = IndexMap::new();
    for record in records {
        let key = (
            record.module.trim().to_lowercase(),
            record.submodule.trim().to_lowercase(),
        );
        groups.entry(key).or_default().push(record.clone());
    }
    groups.into_values().flatten().collect()
}

/// Reassign ids `PREFIX_1..n` in current order
#[must_use]
pub fn renumber(records: &[NormalizedRecord], prefix: &str) -> Vec<NormalizedRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| record.clone().with_id(format!("{prefix}_{}", i + 1)))
        .collect()
}
