//! The face the body is currently wearing.

use serde::{Deserialize, Serialize};

/// Rendered expression. The presentation layer decides what each one
/// looks like; the core only tracks which is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Expression {
    #[default]
    Sleep = 0,
    Happy = 1,
    Talking = 2,
    Listening = 3,
    Sad = 4,
    Love = 5,
}

impl Expression {
    /// Recover an expression from its atomic storage byte.
    pub(crate) fn from_u8(v: u8) -> Expression {
        match v {
            1 => Expression::Happy,
            2 => Expression::Talking,
            3 => Expression::Listening,
            4 => Expression::Sad,
            5 => Expression::Love,
            _ => Expression::Sleep,
        }
    }
}
