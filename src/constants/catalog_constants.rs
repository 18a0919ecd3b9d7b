pub const FEATURED_SAMPLE_SIZE: usize = 6;
pub const MADE_FOR_YOU_SAMPLE_SIZE: usize = 4;
pub const TRENDING_LIMIT: usize = 4;
