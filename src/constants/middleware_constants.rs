pub const AUTHORIZATION_SCHEME: &str = "Bearer ";

/// Only sessions in this state authenticate a request.
pub const ACTIVE_SESSION_STATUS: &str = "active";

pub const MSG_LOGIN_REQUIRED: &str = "Unauthorized - you must be logged in. Please sign in.";
pub const MSG_ADMIN_ONLY: &str = "Unauthorized - admin only";
pub const MSG_ARTIST_ONLY: &str = "Unauthorized - artist or admin only";
pub const MSG_USER_NOT_FOUND: &str = "User not found. Please sign in again.";
