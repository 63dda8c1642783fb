//! 도메인 모델.

mod institutional;
mod market_data;
mod news;

pub use institutional::*;
pub use market_data::*;
pub use news::*;
