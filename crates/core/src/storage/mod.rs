pub mod universe_cache;
