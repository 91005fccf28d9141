pub mod charger;
pub mod feasibility;

pub use charger::*;
pub use feasibility::*;
