pub mod claims;
pub mod principal;
