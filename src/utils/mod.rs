pub mod approval_utils;
pub mod auth_utils;
pub mod file_utils;
pub mod ingest_utils;
pub mod token_utils;
