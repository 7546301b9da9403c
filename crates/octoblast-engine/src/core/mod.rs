pub use self::{board::*, catalog::*, piece::*};

pub(crate) mod board;
pub(crate) mod catalog;
pub(crate) mod piece;
