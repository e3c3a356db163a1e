use crate::commands::logic::models::Coord;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    OutOfBounds,
    NotFound,
    GoalUnreachable,
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogicError {
    #[error("coordinate {coord} is outside the {width}x{height} tile map")]
    OutOfBounds {
        coord: Coord,
        width: i32,
        height: i32,
    },

    #[error("no location grants item `{item}`")]
    RewardNotFound { item: String },

    #[error("no location requires item `{item}`")]
    CostNotFound { item: String },

    #[error("goal {goal} is not a location entrance")]
    GoalNotLocation { goal: Coord },

    #[error("goal {goal} was not completed after {chunks} exploration chunks")]
    GoalUnreachable { goal: Coord, chunks: usize },

    #[error("terrain id {id} at {coord} has no terrain table entry")]
    UnknownTerrain { id: u32, coord: Coord },

    #[error("item `{item}` has no entry in the item value table")]
    UnknownItem { item: String },

    #[error("item values overflow while scoring `{item}`")]
    ValueOverflow { item: String },
}

impl LogicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LogicError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            LogicError::RewardNotFound { .. }
            | LogicError::CostNotFound { .. }
            | LogicError::GoalNotLocation { .. } => ErrorKind::NotFound,
            LogicError::GoalUnreachable { .. } => ErrorKind::GoalUnreachable,
            LogicError::UnknownTerrain { .. }
            | LogicError::UnknownItem { .. }
            | LogicError::ValueOverflow { .. } => ErrorKind::Config,
        }
    }
}

pub type LogicResult<T> = Result<T, LogicError>;
