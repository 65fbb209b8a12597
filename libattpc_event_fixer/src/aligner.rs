use std::fmt::Display;

use super::error::AlignmentError;

/// Correction computed for a run's FRIB numbering.
///
/// Offsets are subtracted: `corrected = recorded - offset`. A negative
/// offset therefore shifts the numbering up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FribCorrection {
    /// Numbering already matches GET; nothing to rewrite.
    None,
    /// One constant offset covers the whole run.
    Uniform { offset: i64 },
    /// The MuTaNT board reset mid-run: one offset applies before the
    /// boundary position, a second from the boundary onward.
    Reset {
        before: i64,
        boundary: usize,
        after: i64,
    },
}

impl Display for FribCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FribCorrection::None => write!(f, "already aligned"),
            FribCorrection::Uniform { offset } => write!(f, "single offset of {offset}"),
            FribCorrection::Reset {
                before,
                boundary,
                after,
            } => write!(
                f,
                "offset {before} up to position {boundary}, then {after} (MuTaNT reset)"
            ),
        }
    }
}

/// Find the offset(s) that align a raw FRIB numbering to the rebased GET numbering.
///
/// Both sequences must be in acquisition order. Alignment is judged on
/// sequence length and order only; timestamps play no part at this stage.
/// A decrease in the FRIB numbering marks a MuTaNT reset candidate;
/// candidates are tried earliest-first and the first split that reconciles
/// the whole run wins. Anything else — unequal lengths, a dropped event, a
/// discontinuity no split explains — is irreconcilable and reported rather
/// than guessed at.
pub fn align(get: &[u64], frib: &[u64]) -> Result<FribCorrection, AlignmentError> {
    if get.len() != frib.len() {
        return Err(AlignmentError::LengthMismatch {
            get_events: get.len(),
            frib_events: frib.len(),
        });
    }
    if frib.is_empty() {
        return Ok(FribCorrection::None);
    }

    let drops: Vec<usize> = (1..frib.len()).filter(|&i| frib[i] < frib[i - 1]).collect();
    let before = frib[0] as i64 - get[0] as i64;

    if drops.is_empty() {
        return match first_divergence(get, frib, 0, frib.len(), before) {
            None if before == 0 => Ok(FribCorrection::None),
            None => Ok(FribCorrection::Uniform { offset: before }),
            Some(index) => Err(AlignmentError::NoUniformOffset {
                index,
                get_number: get[index],
                frib_number: frib[index],
            }),
        };
    }

    // Earliest reconciling discontinuity wins; a split at any later drop
    // leaves an earlier drop inside its leading segment, so at most one
    // candidate can validate.
    for &boundary in drops.iter() {
        let after = frib[boundary] as i64 - get[boundary] as i64;
        if first_divergence(get, frib, 0, boundary, before).is_none()
            && first_divergence(get, frib, boundary, frib.len(), after).is_none()
        {
            return Ok(FribCorrection::Reset {
                before,
                boundary,
                after,
            });
        }
    }

    Err(AlignmentError::UnresolvedReset { positions: drops })
}

/// Index of the first pair in `[start, end)` where `recorded - offset` fails
/// to reproduce the GET number, or None when the segment matches.
fn first_divergence(
    get: &[u64],
    frib: &[u64],
    start: usize,
    end: usize,
    offset: i64,
) -> Option<usize> {
    (start..end).find(|&i| frib[i] as i64 - offset != get[i] as i64)
}

/// Corrected numbering after subtracting the offsets of `correction`.
pub fn apply_correction(frib: &[u64], correction: &FribCorrection) -> Vec<u64> {
    match correction {
        FribCorrection::None => frib.to_vec(),
        FribCorrection::Uniform { offset } => frib
            .iter()
            .map(|number| (*number as i64 - offset) as u64)
            .collect(),
        FribCorrection::Reset {
            before,
            boundary,
            after,
        } => frib
            .iter()
            .enumerate()
            .map(|(position, number)| {
                let offset = if position < *boundary { before } else { after };
                (*number as i64 - offset) as u64
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_uniform_offset() {
        let get = [0_u64, 1, 2];
        let frib = [5_u64, 6, 7];
        let correction = align(&get, &frib).unwrap();
        assert_eq!(correction, FribCorrection::Uniform { offset: 5 });
        assert_eq!(apply_correction(&frib, &correction), vec![0, 1, 2]);
    }

    #[test]
    fn test_align_negative_offset() {
        let get = [3_u64, 4, 5];
        let frib = [1_u64, 2, 3];
        let correction = align(&get, &frib).unwrap();
        assert_eq!(correction, FribCorrection::Uniform { offset: -2 });
        assert_eq!(apply_correction(&frib, &correction), vec![3, 4, 5]);
    }

    #[test]
    fn test_align_already_aligned() {
        let get = [0_u64, 1, 2, 3];
        let frib = [0_u64, 1, 2, 3];
        assert_eq!(align(&get, &frib).unwrap(), FribCorrection::None);
    }

    #[test]
    fn test_align_empty_sequences() {
        assert_eq!(align(&[], &[]).unwrap(), FribCorrection::None);
    }

    #[test]
    fn test_align_mutant_reset() {
        let get = [0_u64, 1, 2, 3, 4, 5];
        let frib = [10_u64, 11, 12, 3, 4, 5];
        let correction = align(&get, &frib).unwrap();
        assert_eq!(
            correction,
            FribCorrection::Reset {
                before: 10,
                boundary: 3,
                after: 0
            }
        );
        let corrected = apply_correction(&frib, &correction);
        assert_eq!(corrected, vec![0, 1, 2, 3, 4, 5]);
        assert!(corrected.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_align_reset_on_gapped_get() {
        // GET itself has a hole; the reset split must still track it exactly.
        let get = [0_u64, 1, 3, 4];
        let frib = [7_u64, 8, 2, 3];
        let correction = align(&get, &frib).unwrap();
        assert_eq!(
            correction,
            FribCorrection::Reset {
                before: 7,
                boundary: 2,
                after: -1
            }
        );
        assert_eq!(apply_correction(&frib, &correction), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_align_rejects_length_mismatch() {
        let get = [0_u64, 1, 2, 3];
        let frib = [0_u64, 1, 2];
        match align(&get, &frib) {
            Err(AlignmentError::LengthMismatch {
                get_events,
                frib_events,
            }) => {
                assert_eq!(get_events, 4);
                assert_eq!(frib_events, 3);
            }
            other => panic!("expected length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_align_rejects_dropped_event() {
        // 102 never recorded; no single shift can close the hole.
        let get = [0_u64, 1, 2, 3];
        let frib = [100_u64, 101, 103, 104];
        match align(&get, &frib) {
            Err(AlignmentError::NoUniformOffset {
                index,
                get_number,
                frib_number,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(get_number, 2);
                assert_eq!(frib_number, 103);
            }
            other => panic!("expected uniform-offset failure, got {other:?}"),
        }
    }

    #[test]
    fn test_align_rejects_double_reset() {
        let get = [0_u64, 1, 2, 3, 4, 5];
        let frib = [10_u64, 11, 3, 4, 1, 2];
        match align(&get, &frib) {
            Err(AlignmentError::UnresolvedReset { positions }) => {
                assert_eq!(positions, vec![2, 4]);
            }
            other => panic!("expected unresolved reset, got {other:?}"),
        }
    }

    #[test]
    fn test_align_rejects_gap_after_reset() {
        let get = [0_u64, 1, 2, 3, 4];
        let frib = [10_u64, 11, 2, 4, 5];
        assert!(matches!(
            align(&get, &frib),
            Err(AlignmentError::UnresolvedReset { .. })
        ));
    }

    #[test]
    fn test_align_reset_at_last_event() {
        let get = [0_u64, 1, 2, 3];
        let frib = [10_u64, 11, 12, 3];
        let correction = align(&get, &frib).unwrap();
        assert_eq!(
            correction,
            FribCorrection::Reset {
                before: 10,
                boundary: 3,
                after: 0
            }
        );
        assert_eq!(apply_correction(&frib, &correction), vec![0, 1, 2, 3]);
    }
}
