pub mod aggregate;
pub mod description_index;
pub mod multisell_url;
pub mod steamid;
