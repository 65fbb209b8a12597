/// Offset that rebases a recorded GET numbering so the run starts from event 0.
///
/// This is the minimum recorded event number; when the MuTaNT board was not
/// reset between runs the GET numbering carries on from the previous run and
/// the minimum is nonzero. Returns None when the run recorded no GET events.
pub fn rebase_offset(numbers: &[u64]) -> Option<u64> {
    numbers.iter().min().copied()
}

/// Shift every recorded number down by the rebase offset.
///
/// `offset` must come from [`rebase_offset`] of the same sequence, so the
/// subtraction cannot underflow. Relative spacing between events is
/// preserved; only the base moves.
pub fn apply_rebase(numbers: &[u64], offset: u64) -> Vec<u64> {
    numbers.iter().map(|n| n - offset).collect()
}
