pub mod cookie;
pub mod handler;
pub mod middleware;
