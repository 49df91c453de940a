pub use autoplay::*;
pub use deduction::*;
pub use solver::*;

mod autoplay;
mod deduction;
mod solver;
