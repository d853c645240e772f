//! Merging of per-chunk responses into one mapping.

use tracing::debug;

use super::types::ChunkOutcome;
use crate::error::{ClientError, ClientResult};
use crate::transport::VariationMap;

/// Merges chunk outcomes in the order given.
///
/// Value lists of keys present in several outcomes are concatenated, so the
/// result for a key is every chunk's values for it, in outcome order. If any
/// outcome failed, no mapping is returned: the error names the first failed
/// chunk and how many chunks failed in total.
pub fn merge(outcomes: Vec<ChunkOutcome>) -> ClientResult<VariationMap> {
    let total = outcomes.len();
    let mut merged = VariationMap::new();
    let mut failed = 0;
    let mut first_failure: Option<(usize, ClientError)> = None;

    for outcome in outcomes {
        match outcome.result {
            Ok(values) => {
                // Nothing is returned once a chunk has failed.
                if first_failure.is_none() {
                    merge_into(&mut merged, values);
                }
            }
            Err(err) => {
                failed += 1;
                if first_failure.is_none() {
                    first_failure = Some((outcome.index, err));
                }
            }
        }
    }

    if let Some((index, source)) = first_failure {
        return Err(ClientError::ChunkFailed {
            index,
            failed,
            total,
            source: Box::new(source),
        });
    }

    debug!(chunks = total, keys = merged.len(), "merged chunk responses");
    Ok(merged)
}

fn merge_into(merged: &mut VariationMap, values: VariationMap) {
    for (key, list) in values {
        merged.entry(key).or_default().extend(list);
    }
}
