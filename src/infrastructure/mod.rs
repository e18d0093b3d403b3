pub mod checkpoint;
pub mod feed;
pub mod ledger;
pub mod persistence;
