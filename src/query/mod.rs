pub mod period;
pub mod scope;
