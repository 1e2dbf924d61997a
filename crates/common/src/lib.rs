// reqbook-common: shared types and wire formats for the reqbook workspace

pub mod codec;
pub mod display;
pub mod protocol;
pub mod types;
