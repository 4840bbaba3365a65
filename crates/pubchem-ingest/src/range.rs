//! CID range validation

use std::collections::VecDeque;

use pubchem_common::CompoundId;

use crate::error::{IngestError, Result};

/// Ids still to be attempted in the current round, in request order
pub type PendingSet = VecDeque<CompoundId>;

/// Expand an inclusive `from..=to` range into the initial pending set.
///
/// Fails when `from <= 0` or `from > to`.
pub fn validate_range(from: i64, to: i64) -> Result<PendingSet> {
    if from <= 0 || from > to {
        return Err(IngestError::InvalidRange { from, to });
    }

    (from..=to)
        .map(|value| CompoundId::new(value).map_err(IngestError::from))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_id_range() {
        let pending = validate_range(1, 1).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].get(), 1);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = validate_range(5, 1).unwrap_err();
        assert!(matches!(err, IngestError::InvalidRange { from: 5, to: 1 }));
    }

    #[test]
    fn test_zero_and_negative_start_rejected() {
        assert!(validate_range(0, 10).is_err());
        assert!(validate_range(-3, 10).is_err());
        assert!(validate_range(-3, -1).is_err());
    }

    proptest! {
        #[test]
        fn prop_valid_range_is_complete_and_ordered(from in 1i64..100_000, len in 0i64..500) {
            let to = from + len;
            let pending = validate_range(from, to).unwrap();
            let values: Vec<u64> = pending.iter().map(|id| id.get()).collect();
            let expected: Vec<u64> = (from as u64..=to as u64).collect();
            prop_assert_eq!(values, expected);
        }

        #[test]
        fn prop_invalid_range_fails(from in -1_000i64..1_000, to in -1_000i64..1_000) {
            prop_assume!(from <= 0 || from > to);
            let is_invalid_range = matches!(
                validate_range(from, to),
                Err(IngestError::InvalidRange { .. })
            );
            prop_assert!(is_invalid_range);
        }
    }
}
