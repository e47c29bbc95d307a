pub mod session_policy;
