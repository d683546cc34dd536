pub mod file_cache;
pub mod host_profile;
pub mod memory_cache;

pub use file_cache::FileCache;
pub use host_profile::FileHostProfile;
pub use memory_cache::MemoryCache;
