pub use self::{collision::*, kinematics::*, obstacle::*};

pub(crate) mod collision;
pub(crate) mod kinematics;
pub(crate) mod obstacle;
