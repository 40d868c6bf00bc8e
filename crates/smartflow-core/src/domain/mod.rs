//! 수급 분석을 위한 도메인 모델.

mod analysis;
mod flow;
mod market_breadth;
mod pattern;
mod signal;
mod trend;

pub use analysis::*;
pub use flow::*;
pub use market_breadth::*;
pub use pattern::*;
pub use signal::*;
pub use trend::*;
