pub mod hash;
pub mod record;
pub mod storage;
pub mod store;

pub use hash::prompt_hash;
pub use record::{CacheRecord, NewCacheRecord};
pub use storage::{LocalFileStorage, PutNew};
pub use store::{FileVideoCache, VideoCacheStore};
