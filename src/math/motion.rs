/// One step of fixed-fraction exponential smoothing.
///
/// Moves `current` by `rate` of the remaining distance to `target`. For
/// `rate` in (0, 1) this never overshoots and never lands on the target.
#[inline]
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Advance a coordinate by `step`, wrapping anything past `bound` back to
/// `-bound`.
#[inline]
pub fn wrap_step(value: f32, step: f32, bound: f32) -> f32 {
    let next = value + step;
    if next > bound {
        -bound
    } else {
        next
    }
}

/// Number of smoothing steps needed before the remaining distance falls below
/// `epsilon` times the starting distance
pub fn steps_to_within(epsilon: f32, rate: f32) -> u32 {
    (epsilon.ln() / (1.0 - rate).ln()).ceil() as u32
}
