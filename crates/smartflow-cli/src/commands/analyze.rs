//! 수급 파일 분석 명령.
//!
//! 입력 파일은 `DailyFlow` 배열(JSON, 시간순)입니다.
//!
//! ```json
//! [
//!   {
//!     "date": "2024-03-01",
//!     "foreign": { "buy": "1200", "sell": "700", "net": "500" },
//!     "institution": { "buy": "900", "sell": "500", "net": "400" },
//!     "retail": { "buy": "800", "sell": "1500", "net": "-700" }
//!   }
//! ]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use smartflow_analytics::SmartMoneyEngine;
use smartflow_core::DailyFlow;
use tracing::info;

/// JSON 파일에서 일간 수급 시계열 로드.
pub fn load_flows(path: &Path) -> Result<Vec<DailyFlow>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("입력 파일을 읽을 수 없습니다: {}", path.display()))?;
    parse_flows(&raw).with_context(|| format!("입력 파일 형식 오류: {}", path.display()))
}

/// JSON 문자열에서 일간 수급 시계열 파싱.
pub fn parse_flows(raw: &str) -> Result<Vec<DailyFlow>> {
    let flows: Vec<DailyFlow> = serde_json::from_str(raw)?;
    Ok(flows)
}

/// 전체 분석 결과를 JSON으로 반환.
pub fn run_analyze(engine: &SmartMoneyEngine, flows: &[DailyFlow], pretty: bool) -> Result<String> {
    let report = engine.analyze(flows).context("수급 분석 실패")?;
    info!(
        date = %report.date,
        signal = %report.combined_signal,
        risk = %report.risk_signal,
        "analysis ready"
    );
    to_json(&report, pretty)
}

/// 패턴 감지 결과를 JSON으로 반환.
pub fn run_patterns(
    engine: &SmartMoneyEngine,
    flows: &[DailyFlow],
    pretty: bool,
) -> Result<String> {
    let patterns = engine.detect_patterns(flows).context("패턴 감지 실패")?;
    info!(count = patterns.len(), "patterns ready");
    to_json(&patterns, pretty)
}

pub(crate) fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
