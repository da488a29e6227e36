//! Broadcast compatibility checks for array shapes.

use crate::error::SeriesError;

/// Return true if two shapes can be broadcast against each other.
///
/// Dimensions are compared from the trailing axis inward. A pair is
/// compatible when the sizes are equal or either is 1. Once the shorter shape
/// is exhausted, the remaining leading dimensions of the longer one are
/// unconstrained.
#[must_use]
pub fn are_broadcastable(left: &[usize], right: &[usize]) -> bool {
    left.iter()
        .rev()
        .zip(right.iter().rev())
        .all(|(&l, &r)| l == r || l == 1 || r == 1)
}

/// Return the shape both operands broadcast to, or `None` if incompatible.
#[must_use]
pub fn broadcast_shape(left: &[usize], right: &[usize]) -> Option<Vec<usize>> {
    if !are_broadcastable(left, right) {
        return None;
    }
    let rank = left.len().max(right.len());
    let mut out = vec![0; rank];
    for (axis, slot) in out.iter_mut().rev().enumerate() {
        let l = left.len().checked_sub(axis + 1).map_or(1, |i| left[i]);
        let r = right.len().checked_sub(axis + 1).map_or(1, |i| right[i]);
        *slot = if l == 1 { r } else { l };
    }
    Some(out)
}

/// Fail fast with [`SeriesError::NotBroadcastable`] unless the shapes broadcast.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`SeriesError::NotBroadcastable`] | Some trailing dimension pair differs and neither is 1 |
pub fn check_broadcastable(left: &[usize], right: &[usize]) -> Result<(), SeriesError> {
    if are_broadcastable(left, right) {
        Ok(())
    } else {
        Err(SeriesError::NotBroadcastable {
            left: left.to_vec(),
            right: right.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_shapes_broadcast() {
        assert!(are_broadcastable(&[3, 4], &[3, 4]));
    }

    #[test]
    fn unit_dimension_on_either_side() {
        assert!(are_broadcastable(&[3, 1], &[3, 4]));
        assert!(are_broadcastable(&[3, 4], &[1, 4]));
        assert!(are_broadcastable(&[1, 1], &[7, 9]));
    }

    #[test]
    fn mismatched_trailing_dimension() {
        assert!(!are_broadcastable(&[3, 4], &[3, 5]));
    }

    #[test]
    fn mismatched_leading_dimension() {
        assert!(!are_broadcastable(&[2, 4], &[3, 4]));
    }

    #[test]
    fn different_rank_ignores_extra_leading_axes() {
        assert!(are_broadcastable(&[5, 3, 4], &[4]));
        assert!(are_broadcastable(&[4], &[9, 2, 4]));
        assert!(!are_broadcastable(&[5, 3, 4], &[3]));
    }

    #[test]
    fn empty_shape_is_scalar() {
        assert!(are_broadcastable(&[], &[3, 4]));
    }

    #[test]
    fn broadcast_shape_expands_unit_axes() {
        assert_eq!(broadcast_shape(&[3, 1], &[1, 4]), Some(vec![3, 4]));
        assert_eq!(broadcast_shape(&[4], &[2, 4]), Some(vec![2, 4]));
        assert_eq!(broadcast_shape(&[3, 4], &[3, 5]), None);
    }

    #[test]
    fn check_reports_both_shapes() {
        let err = check_broadcastable(&[3, 4], &[3, 5]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::NotBroadcastable {
                left: vec![3, 4],
                right: vec![3, 5]
            }
        );
    }
}
