//! Scale selections
//!
//! Two independent selections: a vertical one that only stretches the
//! streetlights along Y, and a uniform one shared by the streetlights and the
//! animated model.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// One of the four selectable scale factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleStep {
    /// ×0.5
    Half,
    /// ×1
    #[default]
    Normal,
    /// ×2
    Double,
    /// ×3
    Triple,
}

const FACTORS: [f32; 4] = [0.5, 1.0, 2.0, 3.0];

impl ScaleStep {
    /// All steps in selection order
    pub const ALL: [Self; 4] = [Self::Half, Self::Normal, Self::Double, Self::Triple];

    /// Multiplier for this step
    pub const fn factor(self) -> f32 {
        FACTORS[self as usize]
    }

    /// Step at a selection index, as a host combo box would report it
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Current vertical and uniform selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScaleSelection {
    /// Streetlight height only
    pub vertical: ScaleStep,
    /// Streetlights and the animated model, all axes
    pub uniform: ScaleStep,
}

impl ScaleSelection {
    /// Uniform scale vector
    pub fn uniform_vector(&self) -> Vec3 {
        Vec3::repeat(self.uniform.factor())
    }

    /// Vertical scale vector
    pub fn vertical_vector(&self) -> Vec3 {
        Vec3::new(1.0, self.vertical.factor(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_table() {
        let factors: Vec<f32> = ScaleStep::ALL.iter().map(|step| step.factor()).collect();
        assert_eq!(factors, vec![0.5, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_index() {
        assert_eq!(ScaleStep::from_index(3), Some(ScaleStep::Triple));
        assert_eq!(ScaleStep::from_index(4), None);
    }

    #[test]
    fn test_vectors() {
        let selection = ScaleSelection { vertical: ScaleStep::Double, uniform: ScaleStep::Half };
        assert_eq!(selection.vertical_vector(), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(selection.uniform_vector(), Vec3::new(0.5, 0.5, 0.5));
    }
}
