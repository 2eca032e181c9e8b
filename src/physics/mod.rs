mod controller;
pub mod forces;
mod quadtree;
mod simulation;

pub use controller::LayoutController;
pub use quadtree::{QuadtreeCell, quadtree_cells};
pub use simulation::{
    FIRST_BUILD_TICKS, RESTART_ALPHA, RenderTarget, Simulation, SimulationPhase,
};

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const JIGGLE_SCALE: f32 = 1e-6;

/// Deterministic linear congruential generator, so a layout replays
/// identically for the same input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        // Top 24 bits, exactly representable.
        (self.state >> 8) as f32 / 16_777_216.0
    }

    /// Tiny offset, centered on zero.
    pub fn jiggle(&mut self) -> f32 {
        (self.next_f32() - 0.5) * JIGGLE_SCALE
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_reproducible() {
        let mut first = Lcg::default();
        let mut second = Lcg::default();
        for _ in 0..5 {
            assert_eq!(first.next_f32(), second.next_f32());
        }
    }

    #[test]
    fn values_stay_in_unit_range() {
        let mut random = Lcg::new(7);
        for _ in 0..1000 {
            let value = random.next_f32();
            assert!((0.0..1.0).contains(&value));
            assert!(random.jiggle().abs() <= JIGGLE_SCALE);
        }
    }
}
