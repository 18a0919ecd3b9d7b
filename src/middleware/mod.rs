pub mod auth_gates;
pub mod cors;
pub mod session_middleware;
