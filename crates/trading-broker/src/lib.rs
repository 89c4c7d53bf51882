//! In-memory collaborators for running agents in simulation.
//!
//! [`PaperPortfolio`] provides data streams, the order factory and the order
//! queue; [`PositionBook`] tracks positions from fills.

mod paper;
mod positions;

pub use paper::{PaperConfig, PaperPortfolio};
pub use positions::PositionBook;
