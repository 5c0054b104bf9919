pub mod orders;
pub mod supply;
