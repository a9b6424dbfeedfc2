pub mod dropbox;
pub mod extraction;
pub mod observability;
pub mod persistence;
pub mod rendering;
