pub mod instance;
pub mod slot;
