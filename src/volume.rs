//! Volume splitting against a pipette's single-transfer capacity.
//!
//! When a requested volume exceeds what the pipette can move in one
//! transfer, it is divided into the smallest number of *equal* aliquots
//! that each fit the capacity. Equal shares keep replicate transfers
//! uniform; a greedy fill-to-capacity split would not.

use crate::error::ProtocolError;

/// Splits `total_ul` into ordered aliquots no larger than `capacity_ul`.
///
/// Returns `[total_ul]` when the volume fits in a single transfer.
/// Otherwise returns `ceil(total / capacity)` equal shares whose sum is
/// exactly the requested total.
pub fn split(total_ul: f64, capacity_ul: f64) -> Result<Vec<f64>, ProtocolError> {
    if !total_ul.is_finite() || total_ul <= 0.0 {
        return Err(ProtocolError::Volume(format!(
            "requested volume must be positive and finite, got {total_ul}"
        )));
    }
    if !capacity_ul.is_finite() || capacity_ul <= 0.0 {
        return Err(ProtocolError::Volume(format!(
            "pipette capacity must be positive and finite, got {capacity_ul}"
        )));
    }

    if total_ul <= capacity_ul {
        return Ok(vec![total_ul]);
    }

    let rounds = (total_ul / capacity_ul).ceil() as usize;
    let share = total_ul / rounds as f64;
    Ok(vec![share; rounds])
}
