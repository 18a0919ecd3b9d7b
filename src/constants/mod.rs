pub mod catalog_constants;
pub mod middleware_constants;
