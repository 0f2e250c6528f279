//! Up-axis conventions and the component remap derived from them.

/// Up-axis declared by a document (`<up_axis>` in COLLADA).
///
/// Documents that declare nothing are treated as Z-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum UpAxis {
    X,
    Y,
    #[default]
    Z,
}

impl UpAxis {
    /// Parse an up-axis declaration such as `Y_UP`.
    ///
    /// Only the leading character is significant (case-insensitive), so `y_up`,
    /// `Y_UP` and `Y` all resolve to [`UpAxis::Y`]. Returns `None` for anything
    /// that does not start with `X`, `Y` or `Z`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().chars().next()?.to_ascii_uppercase() {
            'X' => Some(UpAxis::X),
            'Y' => Some(UpAxis::Y),
            'Z' => Some(UpAxis::Z),
            _ => None,
        }
    }
}

/// Permutation of the components `{0, 1, 2}` applied to every 3-float vector
/// read from a position or normal array.
///
/// Output component `k` is taken from input component `[x, y, z][k]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisRemap {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Default for AxisRemap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AxisRemap {
    pub const IDENTITY: AxisRemap = AxisRemap { x: 0, y: 1, z: 2 };

    /// Swaps the second and third components.
    pub const SWAP_YZ: AxisRemap = AxisRemap { x: 0, y: 2, z: 1 };

    /// Derive the remap for a declared up-axis.
    ///
    /// Y-up documents get their Y and Z components swapped so that every
    /// vector ends up in the Z-up convention. X-up is passed through unchanged.
    pub fn from_up_axis(axis: UpAxis) -> Self {
        match axis {
            UpAxis::Y => Self::SWAP_YZ,
            UpAxis::X => {
                log::debug!("X-up document: vectors are passed through without remapping");
                Self::IDENTITY
            }
            UpAxis::Z => Self::IDENTITY,
        }
    }

    /// The permutation as an array `[x, y, z]`.
    pub fn as_array(&self) -> [usize; 3] {
        [self.x, self.y, self.z]
    }

    /// Reorder one vector.
    pub fn apply(&self, v: [f32; 3]) -> [f32; 3] {
        [v[self.x], v[self.y], v[self.z]]
    }

    /// Read entry `index` of a flat 3-float array and reorder it.
    ///
    /// Returns `None` when the entry lies outside `values`.
    pub fn read(&self, values: &[f32], index: usize) -> Option<[f32; 3]> {
        let start = index.checked_mul(3)?;
        let entry = values.get(start..start + 3)?;
        Some([entry[self.x], entry[self.y], entry[self.z]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_up_axis() {
        assert_eq!(UpAxis::parse("Y_UP"), Some(UpAxis::Y));
        assert_eq!(UpAxis::parse("  z_up\n"), Some(UpAxis::Z));
        assert_eq!(UpAxis::parse("X_UP"), Some(UpAxis::X));
        assert_eq!(UpAxis::parse("W_UP"), None);
        assert_eq!(UpAxis::parse(""), None);
    }

    #[test]
    fn test_default_is_z_up_identity() {
        assert_eq!(UpAxis::default(), UpAxis::Z);
        assert_eq!(AxisRemap::default(), AxisRemap::IDENTITY);
        assert_eq!(AxisRemap::from_up_axis(UpAxis::Z).as_array(), [0, 1, 2]);
    }

    #[test]
    fn test_y_up_swaps_second_and_third() {
        let remap = AxisRemap::from_up_axis(UpAxis::Y);
        assert_eq!(remap.as_array(), [0, 2, 1]);
        assert_eq!(remap.apply([1.0, 2.0, 3.0]), [1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_x_up_is_identity() {
        let remap = AxisRemap::from_up_axis(UpAxis::X);
        assert_eq!(remap.apply([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_read_entry() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let remap = AxisRemap::SWAP_YZ;
        assert_eq!(remap.read(&values, 1), Some([3.0, 5.0, 4.0]));
        assert_eq!(remap.read(&values, 2), None);
        assert_eq!(remap.read(&values[..5], 1), None);
    }
}
