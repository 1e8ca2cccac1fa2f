mod error;
mod store;

pub use error::{RedisDaoError, RedisResult};
pub use store::RedisKvStore;
