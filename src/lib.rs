// Library for tests to access modules

pub mod config;
pub mod error;
pub mod input;
pub mod lxc_repo;
pub mod models;
pub mod rate;
pub mod render;
pub mod snapshot_store;
pub mod terminal;
pub mod version;
pub mod worker;
