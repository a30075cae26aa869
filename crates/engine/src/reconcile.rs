//! The streaming byte-merge algorithm.
//!
//! [`reconcile`] walks two input streams in lockstep, one byte per stream
//! per step, and resolves each position according to a fixed decision
//! table:
//!
//! | left | right | resolved | flags |
//! |---|---|---|---|
//! | EOF | EOF | stop | - |
//! | x | x (equal) | x | - |
//! | EOF | r | r | `changed_left` |
//! | l | EOF | l | `changed_right` |
//! | 0 | r (r != 0) | r | `changed_left` |
//! | l (l != 0) | 0 | l | `changed_right` |
//! | l != 0 | r != 0, l != r | conflict | halt |
//!
//! End-of-file is treated as an infinite run of zero bytes for comparison,
//! so the merged output is as long as the longer input. Two equal explicit
//! zeros are not a change - there is no information to propagate in either
//! direction. Offsets are 1-based in all reporting.

use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use tracing::debug;

use crate::error::ReconcileError;

/// Statistics and change flags produced by a successful reconciliation.
///
/// A conflict never produces one of these; it surfaces as
/// [`ReconcileError::Conflict`] instead, so a populated result and a
/// conflict offset are mutually exclusive by construction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconciliationResult {
    /// Bytes resolved to a non-zero value (equal or one-sided data).
    pub common_count: u64,
    /// Bytes resolved to zero.
    pub zero_count: u64,
    /// Whether the left file differs from the merged output.
    pub changed_left: bool,
    /// Whether the right file differs from the merged output.
    pub changed_right: bool,
}

impl ReconciliationResult {
    /// Total number of merged bytes; equals the length of the longer input.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.common_count + self.zero_count
    }

    /// Returns `true` when neither input needs rewriting.
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        !self.changed_left && !self.changed_right
    }
}

/// Reads the next byte, distinguishing end-of-file from errors.
fn next_byte<R: BufRead>(reader: &mut R, action: &'static str) -> Result<Option<u8>, ReconcileError> {
    let buffer = reader
        .fill_buf()
        .map_err(|error| ReconcileError::io(action, error))?;
    if buffer.is_empty() {
        return Ok(None);
    }
    let byte = buffer[0];
    reader.consume(1);
    Ok(Some(byte))
}

/// Merges `left` and `right` into `merged`, byte by byte.
///
/// The caller controls the initial position of both readers; the merged
/// stream is written from wherever `merged` currently points and flushed
/// before returning. On conflict the function halts immediately - nothing
/// further is read or written, and whatever was already written to
/// `merged` must be discarded by the caller.
pub fn reconcile<L, R, W>(
    left: L,
    right: R,
    merged: W,
) -> Result<ReconciliationResult, ReconcileError>
where
    L: Read,
    R: Read,
    W: Write,
{
    let mut left = BufReader::new(left);
    let mut right = BufReader::new(right);
    let mut writer = BufWriter::new(merged);

    let mut result = ReconciliationResult::default();
    let mut offset: u64 = 0;

    loop {
        let lhs = next_byte(&mut left, "read left input")?;
        let rhs = next_byte(&mut right, "read right input")?;
        offset += 1;

        let resolved = match (lhs, rhs) {
            (None, None) => break,
            (Some(l), Some(r)) if l == r => l,
            (None, Some(r)) => {
                result.changed_left = true;
                r
            }
            (Some(l), None) => {
                result.changed_right = true;
                l
            }
            (Some(0), Some(r)) => {
                result.changed_left = true;
                r
            }
            (Some(l), Some(0)) => {
                result.changed_right = true;
                l
            }
            (Some(_), Some(_)) => {
                debug!(offset, "irreconcilable difference");
                return Err(ReconcileError::Conflict { offset });
            }
        };

        if resolved == 0 {
            result.zero_count += 1;
        } else {
            result.common_count += 1;
        }
        writer
            .write_all(&[resolved])
            .map_err(|error| ReconcileError::io("write merged output", error))?;
    }

    writer
        .flush()
        .map_err(|error| ReconcileError::io("flush merged output", error))?;

    debug!(
        common = result.common_count,
        zero = result.zero_count,
        changed_left = result.changed_left,
        changed_right = result.changed_right,
        "reconciliation complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(left: &[u8], right: &[u8]) -> (ReconciliationResult, Vec<u8>) {
        let mut merged = Vec::new();
        let result = reconcile(left, right, &mut merged).expect("inputs reconcile");
        (result, merged)
    }

    #[test]
    fn equal_files_are_identical() {
        let data = [1u8, 0, 2, 0, 0, 3];
        let (result, merged) = merge(&data, &data);
        assert!(result.is_identical());
        assert_eq!(result.common_count, 3);
        assert_eq!(result.zero_count, 3);
        assert_eq!(merged, data);
    }

    #[test]
    fn complementary_sparse_copies_merge_fully() {
        // At every offset at least one side is zero.
        let left = [1u8, 0, 3, 0];
        let right = [0u8, 2, 0, 4];
        let (result, merged) = merge(&left, &right);
        assert_eq!(merged, vec![1, 2, 3, 4]);
        assert!(result.changed_left);
        assert!(result.changed_right);
        assert_eq!(result.common_count, 4);
        assert_eq!(result.zero_count, 0);
    }

    #[test]
    fn shorter_file_is_an_implicit_zero_tail() {
        let left = [9u8];
        let right = [9u8, 8, 7];
        let (result, merged) = merge(&left, &right);
        assert_eq!(merged, vec![9, 8, 7]);
        assert!(result.changed_left);
        assert!(!result.changed_right);
    }

    #[test]
    fn explicit_zero_tail_matches_eof_tail() {
        let left = [9u8, 0, 0];
        let right = [9u8, 8, 7];
        let (result, merged) = merge(&left, &right);
        assert_eq!(merged, vec![9, 8, 7]);
        assert!(result.changed_left);
        assert!(!result.changed_right);
    }

    #[test]
    fn empty_left_input_takes_right_content() {
        let (result, merged) = merge(&[], &[1, 2, 3]);
        assert_eq!(merged, vec![1, 2, 3]);
        assert!(result.changed_left);
        assert!(!result.changed_right);
        assert_eq!(result.total(), 3);
    }

    #[test]
    fn both_empty_inputs_merge_to_nothing() {
        let (result, merged) = merge(&[], &[]);
        assert_eq!(result, ReconciliationResult::default());
        assert!(merged.is_empty());
    }

    #[test]
    fn equal_explicit_zeros_are_not_a_change() {
        let (result, merged) = merge(&[0], &[0]);
        assert!(result.is_identical());
        assert_eq!(result.zero_count, 1);
        assert_eq!(merged, vec![0]);
    }

    #[test]
    fn conflict_reports_one_based_offset() {
        let mut merged = Vec::new();
        let error = reconcile(&[5u8][..], &[7u8][..], &mut merged).unwrap_err();
        match error {
            ReconcileError::Conflict { offset } => assert_eq!(offset, 1),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn conflict_halts_without_reading_further() {
        // The conflict sits at offset 2; the streams differ irreconcilably
        // again at offset 3, which must never be reached.
        let left = [1u8, 5, 11];
        let right = [1u8, 7, 13];
        let error = reconcile(&left[..], &right[..], &mut Vec::new()).unwrap_err();
        match error {
            ReconcileError::Conflict { offset } => assert_eq!(offset, 2),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn merged_length_is_max_of_inputs() {
        let (result, merged) = merge(&[0, 0, 0, 0, 5], &[1, 2]);
        assert_eq!(merged, vec![1, 2, 0, 0, 5]);
        assert_eq!(result.total(), 5);
        assert_eq!(result.common_count, 3);
        assert_eq!(result.zero_count, 2);
    }

    #[test]
    fn remerging_merged_output_is_idempotent() {
        let left = [1u8, 0, 3, 0];
        let right = [0u8, 2, 0, 4];
        let (_, merged) = merge(&left, &right);

        let (second, remerged) = merge(&merged, &right);
        assert!(!second.changed_left);
        assert!(second.changed_right);
        assert_eq!(remerged, merged);

        let (third, _) = merge(&merged, &merged);
        assert!(third.is_identical());
    }
}
