pub mod store;

pub use store::{positions_equal, Position, PositionError, PositionStore, Positions};
