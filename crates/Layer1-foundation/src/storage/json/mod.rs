//! JSON file store

mod store;

pub use store::JsonStore;
