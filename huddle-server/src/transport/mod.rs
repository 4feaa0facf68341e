mod connection_hub;

pub use connection_hub::*;
