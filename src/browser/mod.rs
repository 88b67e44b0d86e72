pub mod collector;
pub mod steamcommunity;
