pub mod catalog;
pub mod currency;
pub mod nbp;
pub mod trips;
