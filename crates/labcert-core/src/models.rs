pub mod cell;
pub mod certificate;
pub mod department;
pub mod payload;
pub mod sample;
pub mod unit;
pub mod verdict;
