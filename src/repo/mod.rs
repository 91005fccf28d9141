pub mod chargers;

pub use chargers::{ChargerPage, ChargerTable, QueryError};
