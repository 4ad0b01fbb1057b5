pub mod bbox;
pub mod classify;
pub mod cluster;
pub mod header;
pub mod number;
