pub mod programmer;
pub mod setting;
