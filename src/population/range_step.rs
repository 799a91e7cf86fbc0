/// Decides how much the ring search range grows after each ring.
pub trait RangeStep {
    fn increment(&self, range: u32, longest_dimension: u32) -> u32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UnitRangeStep;

impl RangeStep for UnitRangeStep {
    fn increment(&self, _range: u32, _longest_dimension: u32) -> u32 {
        1
    }
}

/// Small steps near the city center, larger ones once the range covers
/// `threshold_fraction` of the grid's longest side.
#[derive(Debug, Clone, Copy)]
pub struct PhasedRangeStep {
    pub threshold_fraction: f64,
    pub small_step: u32,
    pub large_step: u32,
}

impl RangeStep for PhasedRangeStep {
    fn increment(&self, range: u32, longest_dimension: u32) -> u32 {
        if (range as f64) < self.threshold_fraction * longest_dimension as f64 {
            self.small_step
        } else {
            self.large_step
        }
    }
}
