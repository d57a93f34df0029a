/// Row sets smaller than this become leaves without a split search.
pub const MIN_SPLIT_ROWS: usize = 3;
/// Minimum row count of a node before its child builds fan out to rayon.
pub const PARALLEL_MIN_ROWS: usize = 1024;
