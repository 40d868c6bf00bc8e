//! 연속 구간(run) 탐색.

use std::ops::Range;

use rust_decimal::Decimal;
use smartflow_core::{DailyFlow, PatternAction, PatternType, RiskLevel, RunRuleConfig};

/// 하루가 패턴 조건을 만족하는지 판정하는 함수.
pub type DayPredicate<'a> = Box<dyn Fn(&DailyFlow) -> bool + 'a>;

/// 패턴 감지 시 권장 행동과 리스크.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidance {
    /// 권장 행동
    pub action: PatternAction,
    /// 리스크 수준
    pub risk_level: RiskLevel,
}

/// 연속 구간 패턴 규칙.
pub struct RunRule<'a> {
    /// 패턴 유형
    pub pattern_type: PatternType,
    /// 조건을 만족하는 날
    pub qualifies: DayPredicate<'a>,
    /// 구간 누적 수급으로 측정할 값
    pub measured_flow: fn(&DailyFlow) -> Decimal,
    /// 최소 일수, 강도 가중치, 참여 기준
    pub settings: &'a RunRuleConfig,
    /// 권장 행동
    pub guidance: Guidance,
}

impl RunRule<'_> {
    /// 가장 최근의 최대 연속 구간 (길이 >= `min_run`).
    pub fn latest_run(&self, series: &[DailyFlow]) -> Option<Range<usize>> {
        latest_run(series, &self.qualifies, self.settings.min_run)
    }

    /// 구간 내 측정 수급 합계.
    pub fn total_flow(&self, window: &[DailyFlow]) -> Decimal {
        window.iter().map(self.measured_flow).sum()
    }
}

/// 조건을 만족하는 최대 연속 구간 중 가장 최근 것.
///
/// 길이가 `min_run` 미만인 구간은 무시합니다.
pub fn latest_run<F>(series: &[DailyFlow], qualifies: F, min_run: usize) -> Option<Range<usize>>
where
    F: Fn(&DailyFlow) -> bool,
{
    let mut latest = None;
    let mut start: Option<usize> = None;

    for (i, day) in series.iter().enumerate() {
        match (qualifies(day), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= min_run {
                    latest = Some(s..i);
                }
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        if series.len() - s >= min_run {
            latest = Some(s..series.len());
        }
    }

    latest
}

/// 부호가 같은 연속 구간 목록 (0은 구간을 끊음).
pub fn sign_segments(values: &[Decimal]) -> Vec<(i8, Range<usize>)> {
    let mut segments: Vec<(i8, Range<usize>)> = Vec::new();

    for (i, value) in values.iter().enumerate() {
        let sign = signum(*value);
        if sign == 0 {
            continue;
        }
        if let Some((last_sign, range)) = segments.last_mut() {
            if *last_sign == sign && range.end == i {
                range.end = i + 1;
                continue;
            }
        }
        segments.push((sign, i..i + 1));
    }

    segments
}

pub fn signum(value: Decimal) -> i8 {
    if value > Decimal::ZERO {
        1
    } else if value < Decimal::ZERO {
        -1
    } else {
        0
    }
}
