use glam::{Vec2, Vec3};

use super::error::InvalidInputError;

/// The point containers accepted by `MeshLineGeometry::set_points`.
///
/// Two-component forms get `z = 0`. `Rows` covers dynamically shaped data (for
/// example decoded JSON), where every row must hold 2 or 3 scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum PointsInput {
    /// `[x0, y0, z0, x1, y1, z1, ...]`
    Flat(Vec<f32>),
    Vec3(Vec<Vec3>),
    Vec2(Vec<Vec2>),
    Array3(Vec<[f32; 3]>),
    Array2(Vec<[f32; 2]>),
    Rows(Vec<Vec<f32>>),
}

impl PointsInput {
    /// Reads the container as a list of 3D points.
    pub fn to_points(&self) -> Result<Vec<Vec3>, InvalidInputError> {
        match self {
            PointsInput::Flat(flat) => {
                if flat.len() % 3 != 0 {
                    return Err(InvalidInputError::unrecognized(format!(
                        "flat array length {} is not a multiple of 3",
                        flat.len()
                    )));
                }
                Ok(flat.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2])).collect())
            }
            PointsInput::Vec3(points) => Ok(points.clone()),
            PointsInput::Vec2(points) => Ok(points.iter().map(|p| p.extend(0.0)).collect()),
            PointsInput::Array3(points) => Ok(points.iter().copied().map(Vec3::from).collect()),
            PointsInput::Array2(points) => {
                Ok(points.iter().map(|&[x, y]| Vec3::new(x, y, 0.0)).collect())
            }
            PointsInput::Rows(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| match row.as_slice() {
                    &[x, y, z] => Ok(Vec3::new(x, y, z)),
                    &[x, y] => Ok(Vec3::new(x, y, 0.0)),
                    other => Err(InvalidInputError::unrecognized(format!(
                        "row {i} has {} components, expected 2 or 3",
                        other.len()
                    ))),
                })
                .collect(),
        }
    }

    /// Returns true when the container holds no data. The shape is not validated.
    pub fn is_empty(&self) -> bool {
        match self {
            PointsInput::Flat(v) => v.is_empty(),
            PointsInput::Vec3(v) => v.is_empty(),
            PointsInput::Vec2(v) => v.is_empty(),
            PointsInput::Array3(v) => v.is_empty(),
            PointsInput::Array2(v) => v.is_empty(),
            PointsInput::Rows(v) => v.is_empty(),
        }
    }
}

impl Default for PointsInput {
    fn default() -> Self {
        PointsInput::Flat(Vec::new())
    }
}

impl From<Vec<f32>> for PointsInput {
    fn from(v: Vec<f32>) -> Self {
        PointsInput::Flat(v)
    }
}

impl From<&[f32]> for PointsInput {
    fn from(v: &[f32]) -> Self {
        PointsInput::Flat(v.to_vec())
    }
}

impl From<Vec<Vec3>> for PointsInput {
    fn from(v: Vec<Vec3>) -> Self {
        PointsInput::Vec3(v)
    }
}

impl From<&[Vec3]> for PointsInput {
    fn from(v: &[Vec3]) -> Self {
        PointsInput::Vec3(v.to_vec())
    }
}

impl From<Vec<Vec2>> for PointsInput {
    fn from(v: Vec<Vec2>) -> Self {
        PointsInput::Vec2(v)
    }
}

impl From<Vec<[f32; 3]>> for PointsInput {
    fn from(v: Vec<[f32; 3]>) -> Self {
        PointsInput::Array3(v)
    }
}

impl From<Vec<[f32; 2]>> for PointsInput {
    fn from(v: Vec<[f32; 2]>) -> Self {
        PointsInput::Array2(v)
    }
}

impl From<Vec<(f32, f32, f32)>> for PointsInput {
    fn from(v: Vec<(f32, f32, f32)>) -> Self {
        PointsInput::Array3(v.into_iter().map(|(x, y, z)| [x, y, z]).collect())
    }
}

impl From<Vec<(f32, f32)>> for PointsInput {
    fn from(v: Vec<(f32, f32)>) -> Self {
        PointsInput::Array2(v.into_iter().map(|(x, y)| [x, y]).collect())
    }
}

impl From<Vec<Vec<f32>>> for PointsInput {
    fn from(v: Vec<Vec<f32>>) -> Self {
        PointsInput::Rows(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::error::InvalidInputKind;

    #[test]
    fn flat_triples() {
        let pts = PointsInput::from(vec![0.0f32, 1.0, 2.0, 3.0, 4.0, 5.0]).to_points().unwrap();
        assert_eq!(pts, vec![Vec3::new(0.0, 1.0, 2.0), Vec3::new(3.0, 4.0, 5.0)]);
    }

    #[test]
    fn flat_ragged_is_rejected() {
        let err = PointsInput::from(vec![0.0f32, 1.0, 2.0, 3.0]).to_points().unwrap_err();
        assert!(matches!(err.kind, InvalidInputKind::UnrecognizedShape(_)));
    }

    #[test]
    fn two_component_forms_default_z() {
        let a = PointsInput::from(vec![Vec2::new(1.0, 2.0)]).to_points().unwrap();
        let b = PointsInput::from(vec![[1.0f32, 2.0]]).to_points().unwrap();
        let c = PointsInput::from(vec![(1.0f32, 2.0)]).to_points().unwrap();
        assert_eq!(a, vec![Vec3::new(1.0, 2.0, 0.0)]);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn tuples3_match_vec3() {
        let a = PointsInput::from(vec![(1.0f32, 2.0, 3.0)]).to_points().unwrap();
        let b = PointsInput::from(vec![Vec3::new(1.0, 2.0, 3.0)]).to_points().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rows_accept_mixed_lengths() {
        let pts = PointsInput::from(vec![vec![1.0f32, 2.0], vec![3.0, 4.0, 5.0]])
            .to_points()
            .unwrap();
        assert_eq!(pts, vec![Vec3::new(1.0, 2.0, 0.0), Vec3::new(3.0, 4.0, 5.0)]);
    }

    #[test]
    fn rows_with_bad_arity_are_rejected() {
        let err = PointsInput::from(vec![vec![1.0f32, 2.0, 3.0, 4.0]]).to_points().unwrap_err();
        assert!(err.to_string().contains("row 0 has 4 components"));
    }
}
