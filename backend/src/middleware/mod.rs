/// Launch data verification middleware and extractor
pub mod init_data;

pub use init_data::{init_data_middleware, TelegramUser};
