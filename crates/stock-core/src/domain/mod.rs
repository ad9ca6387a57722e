//! 게이트웨이 응답 도메인 모델.

mod news;
mod quote;
mod search;

pub use news::*;
pub use quote::*;
pub use search::*;
