//! 시장 폭 계산 명령.

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use smartflow_analytics::SmartMoneyEngine;
use smartflow_core::BreadthInput;
use tracing::info;

use super::analyze::to_json;

/// 시장 폭 명령 인자.
#[derive(Debug, Clone)]
pub struct BreadthArgs {
    pub advances: u32,
    pub declines: u32,
    pub unchanged: u32,
    pub new_highs: Option<u32>,
    pub new_lows: Option<u32>,
    pub previous_ad_ratio: Option<Decimal>,
}

impl BreadthArgs {
    /// 엔진 입력으로 변환. 신고가/신저가는 함께 지정해야 합니다.
    pub fn to_input(&self) -> Result<BreadthInput> {
        let input = BreadthInput::new(self.advances, self.declines, self.unchanged);
        match (self.new_highs, self.new_lows) {
            (Some(highs), Some(lows)) => Ok(input.with_highs_lows(highs, lows)),
            (None, None) => Ok(input),
            _ => bail!("--new-highs 와 --new-lows 는 함께 지정해야 합니다"),
        }
    }
}

/// 시장 폭 분석 결과를 JSON으로 반환.
pub fn run_breadth(engine: &SmartMoneyEngine, args: &BreadthArgs, pretty: bool) -> Result<String> {
    let input = args.to_input()?;
    let report = engine.analyze_breadth(&input, args.previous_ad_ratio);
    info!(status = %report.status, confidence = report.confidence, "breadth ready");
    to_json(&report, pretty)
}
