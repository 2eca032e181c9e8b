use std::fmt;

/// Depth keyed sizing and force weighting for nodes and links.
pub trait LayoutPolicy: fmt::Debug + Send + Sync {
    fn radius_for(&self, depth: u32) -> f32;

    /// Many-body strength; negative values repel.
    fn charge_for(&self, depth: u32, factor: f32) -> f32;

    fn link_force_for(&self, depth: u32, weight: f32, factor: f32) -> f32;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutPreset {
    /// Root and first ring dominate, deep nodes barely push.
    #[default]
    Tiered,
    /// Every depth sized and charged like the first ring.
    Flat,
}

impl LayoutPreset {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tiered => "Tiered",
            Self::Flat => "Flat",
        }
    }

    pub fn policy(self) -> DepthTieredPolicy {
        match self {
            Self::Tiered => DepthTieredPolicy {
                radii: [30.0, 15.0, 5.0, 2.0],
                charges: [-8000.0, -4000.0, -50.0, -5.0],
            },
            Self::Flat => DepthTieredPolicy {
                radii: [15.0; 4],
                charges: [-400.0; 4],
            },
        }
    }
}

/// Four tiers: root, depth one, depth two, everything deeper.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthTieredPolicy {
    radii: [f32; 4],
    charges: [f32; 4],
}

fn tier(depth: u32) -> usize {
    (depth as usize).min(3)
}

impl LayoutPolicy for DepthTieredPolicy {
    fn radius_for(&self, depth: u32) -> f32 {
        self.radii[tier(depth)]
    }

    fn charge_for(&self, depth: u32, factor: f32) -> f32 {
        self.charges[tier(depth)] * factor
    }

    fn link_force_for(&self, depth: u32, weight: f32, factor: f32) -> f32 {
        // Past 1 the link over-corrects and oscillates.
        (factor * weight / (1.0 + depth as f32)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiered_preset_shrinks_with_depth() {
        let policy = LayoutPreset::Tiered.policy();
        assert_eq!(policy.radius_for(0), 30.0);
        assert_eq!(policy.radius_for(1), 15.0);
        assert_eq!(policy.radius_for(2), 5.0);
        assert_eq!(policy.radius_for(7), 2.0);
        assert_eq!(policy.charge_for(0, 1.5), -12000.0);
        assert_eq!(policy.charge_for(999, 1.0), -5.0);
    }

    #[test]
    fn link_force_attenuates_with_depth_and_weight() {
        let policy = LayoutPreset::Tiered.policy();
        let near = policy.link_force_for(0, 0.5, 1.2);
        let far = policy.link_force_for(3, 0.5, 1.2);
        let light = policy.link_force_for(0, 0.1, 1.2);
        assert!(near > far);
        assert!(near > light);
        assert_eq!(policy.link_force_for(0, 1.0, 6.0), 1.0);
    }
}
