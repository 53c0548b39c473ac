/// Cell kinds of the occupancy grid and their file codes.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum CellKind {
    #[default]
    Empty,
    PlayerSpawn, // Load-time marker only, rewritten to Empty
    Wall,
    Flag,        // Goal
}

/// A code in a grid file that names no known cell kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UnknownCellCode(pub i64);

impl CellKind {
    /// Does this cell stop movement?
    pub fn is_wall(self) -> bool {
        matches!(self, CellKind::Wall)
    }

    /// Does a ray stop when it enters this cell?
    /// The goal is drawn as a solid block so it can be seen from afar.
    pub fn blocks_ray(self) -> bool {
        matches!(self, CellKind::Wall | CellKind::Flag)
    }

    pub fn is_goal(self) -> bool {
        matches!(self, CellKind::Flag)
    }
}

impl TryFrom<i64> for CellKind {
    type Error = UnknownCellCode;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CellKind::Empty),
            1 => Ok(CellKind::PlayerSpawn),
            2 => Ok(CellKind::Wall),
            3 => Ok(CellKind::Flag),
            other => Err(UnknownCellCode(other)),
        }
    }
}
