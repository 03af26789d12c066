/// Time values and spans shared by every stage.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
