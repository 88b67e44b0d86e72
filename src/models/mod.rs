pub mod inventory;
pub mod web;
