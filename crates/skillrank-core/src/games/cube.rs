//! Cube faces, palette colors, and quarter-turn orientation tracking.
//!
//! Faces are named by their world position, not by the sticker they carry:
//! after a rotation, `Face::Front` is whatever now faces the viewer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A world-fixed face position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Face> {
        Face::ALL.get(index).copied()
    }

    /// Outward normal, with +Z toward the viewer and +Y up.
    fn normal(self) -> [i32; 3] {
        match self {
            Face::Front => [0, 0, 1],
            Face::Back => [0, 0, -1],
            Face::Top => [0, 1, 0],
            Face::Bottom => [0, -1, 0],
            Face::Left => [-1, 0, 0],
            Face::Right => [1, 0, 0],
        }
    }

    fn from_normal(n: [i32; 3]) -> Face {
        match n {
            [0, 0, 1] => Face::Front,
            [0, 0, -1] => Face::Back,
            [0, 1, 0] => Face::Top,
            [0, -1, 0] => Face::Bottom,
            [-1, 0, 0] => Face::Left,
            _ => Face::Right,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Top => "top",
            Face::Bottom => "bottom",
            Face::Left => "left",
            Face::Right => "right",
        };
        f.write_str(name)
    }
}

/// The six answer colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorId {
    Cyan,
    LightGreen,
    Yellow,
    Pink,
    Black,
    Red,
}

impl ColorId {
    pub const ALL: [ColorId; 6] = [
        ColorId::Cyan,
        ColorId::LightGreen,
        ColorId::Yellow,
        ColorId::Pink,
        ColorId::Black,
        ColorId::Red,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Answer-button index to color. `None` outside the palette.
    pub fn from_index(index: usize) -> Option<ColorId> {
        ColorId::ALL.get(index).copied()
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorId::Cyan => "cyan",
            ColorId::LightGreen => "light green",
            ColorId::Yellow => "yellow",
            ColorId::Pink => "pink",
            ColorId::Black => "black",
            ColorId::Red => "red",
        };
        f.write_str(name)
    }
}

/// Axis of a quarter turn, right-hand rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl RotationAxis {
    pub const ALL: [RotationAxis; 6] = [
        RotationAxis::PositiveX,
        RotationAxis::NegativeX,
        RotationAxis::PositiveY,
        RotationAxis::NegativeY,
        RotationAxis::PositiveZ,
        RotationAxis::NegativeZ,
    ];

    pub fn inverse(self) -> RotationAxis {
        match self {
            RotationAxis::PositiveX => RotationAxis::NegativeX,
            RotationAxis::NegativeX => RotationAxis::PositiveX,
            RotationAxis::PositiveY => RotationAxis::NegativeY,
            RotationAxis::NegativeY => RotationAxis::PositiveY,
            RotationAxis::PositiveZ => RotationAxis::NegativeZ,
            RotationAxis::NegativeZ => RotationAxis::PositiveZ,
        }
    }

    /// Rotate an integer vector by +90 degrees about this axis.
    fn quarter_turn(self, [x, y, z]: [i32; 3]) -> [i32; 3] {
        match self {
            RotationAxis::PositiveX => [x, -z, y],
            RotationAxis::NegativeX => [x, z, -y],
            RotationAxis::PositiveY => [z, y, -x],
            RotationAxis::NegativeY => [-z, y, x],
            RotationAxis::PositiveZ => [-y, x, z],
            RotationAxis::NegativeZ => [y, -x, z],
        }
    }

    /// Where a face position ends up after one quarter turn.
    pub fn carry(self, face: Face) -> Face {
        Face::from_normal(self.quarter_turn(face.normal()))
    }
}

/// Colors currently showing at each face position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeOrientation {
    colors: [ColorId; 6],
}

impl Default for CubeOrientation {
    /// Front cyan, back light green, top yellow, bottom pink, left black, right red.
    fn default() -> Self {
        Self {
            colors: ColorId::ALL,
        }
    }
}

impl CubeOrientation {
    pub fn new(colors: [ColorId; 6]) -> Self {
        Self { colors }
    }

    pub fn color_at(&self, face: Face) -> ColorId {
        self.colors[face.index()]
    }

    /// Apply one quarter turn.
    pub fn rotate(&mut self, axis: RotationAxis) {
        let mut next = self.colors;
        for face in Face::ALL {
            next[axis.carry(face).index()] = self.colors[face.index()];
        }
        self.colors = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_x_carries_front_to_bottom() {
        assert_eq!(RotationAxis::PositiveX.carry(Face::Front), Face::Bottom);
        assert_eq!(RotationAxis::PositiveX.carry(Face::Top), Face::Front);
        assert_eq!(RotationAxis::PositiveX.carry(Face::Left), Face::Left);
    }

    #[test]
    fn positive_y_and_z_turns() {
        assert_eq!(RotationAxis::PositiveY.carry(Face::Front), Face::Right);
        assert_eq!(RotationAxis::PositiveY.carry(Face::Top), Face::Top);
        assert_eq!(RotationAxis::PositiveZ.carry(Face::Right), Face::Top);
        assert_eq!(RotationAxis::PositiveZ.carry(Face::Front), Face::Front);
    }

    #[test]
    fn rotation_moves_colors() {
        let mut cube = CubeOrientation::default();
        cube.rotate(RotationAxis::PositiveX);
        assert_eq!(cube.color_at(Face::Bottom), ColorId::Cyan);
        assert_eq!(cube.color_at(Face::Front), ColorId::Yellow);
        assert_eq!(cube.color_at(Face::Left), ColorId::Black);
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        for axis in RotationAxis::ALL {
            let mut cube = CubeOrientation::default();
            for _ in 0..4 {
                cube.rotate(axis);
            }
            assert_eq!(cube, CubeOrientation::default(), "axis {axis:?}");
        }
    }

    #[test]
    fn inverse_undoes_turn() {
        for axis in RotationAxis::ALL {
            let mut cube = CubeOrientation::default();
            cube.rotate(axis);
            assert_ne!(cube, CubeOrientation::default());
            cube.rotate(axis.inverse());
            assert_eq!(cube, CubeOrientation::default());
        }
    }

    #[test]
    fn every_color_survives_rotation() {
        let mut cube = CubeOrientation::default();
        for axis in [
            RotationAxis::PositiveY,
            RotationAxis::NegativeZ,
            RotationAxis::PositiveX,
        ] {
            cube.rotate(axis);
        }
        let mut seen: Vec<ColorId> = Face::ALL.iter().map(|f| cube.color_at(*f)).collect();
        seen.sort_by_key(|c| c.index());
        assert_eq!(seen, ColorId::ALL.to_vec());
    }

    #[test]
    fn palette_index_bounds() {
        assert_eq!(ColorId::from_index(0), Some(ColorId::Cyan));
        assert_eq!(ColorId::from_index(5), Some(ColorId::Red));
        assert_eq!(ColorId::from_index(6), None);
        assert_eq!(Face::from_index(3), Some(Face::Bottom));
        assert_eq!(Face::from_index(9), None);
    }
}
