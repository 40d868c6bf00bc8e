//! 다일간 수급 패턴 감지.
//!
//! 시간순 일간 수급에서 조건을 만족하는 연속 구간을 찾아 패턴으로 보고합니다.
//! 패턴 유형마다 가장 최근 구간 하나만 보고합니다.
//!
//! | 패턴          | 조건                                   | 최소 일수 | 행동               | 리스크 |
//! |---------------|----------------------------------------|-----------|--------------------|--------|
//! | Accumulation  | 외국인 + 기관 > 0                      | 3         | accumulate         | LOW    |
//! | Distribution  | 외국인 + 기관 < 0                      | 3         | reduce             | HIGH   |
//! | Divergence    | 스마트 머니와 개인 반대 방향 (각 > 100) | 2         | follow_smart_money | MEDIUM |
//! | Fomo          | 개인 > 500                             | 2         | take_profit        | HIGH   |
//! | Panic         | 개인 < -500                            | 2         | watch_for_rebound  | MEDIUM |
//! | Reversal      | 3일 이상 구간 후 방향 전환 (각 > 100)   | 2         | reassess_position  | MEDIUM |
//!
//! 강도 = min(100, 일수 × 가중치 + |누적 수급| / 환산 단위)

mod roles;
mod run;

pub use roles::{assign_participant_roles, involved_categories};
pub use run::{latest_run, Guidance, RunRule};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use smartflow_core::{
    DailyFlow, DetectedPattern, InvestorCategory, PatternAction, PatternConfig, PatternType,
    RiskLevel,
};
use tracing::debug;

use self::run::{sign_segments, signum};

/// 패턴 감지기.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    /// 새 감지기 생성.
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// 모든 패턴 감지 (강도 내림차순).
    pub fn detect_all(&self, series: &[DailyFlow]) -> Vec<DetectedPattern> {
        let mut patterns: Vec<DetectedPattern> = [
            self.detect_accumulation(series),
            self.detect_distribution(series),
            self.detect_divergence(series),
            self.detect_fomo(series),
            self.detect_panic(series),
            self.detect_reversal(series),
        ]
        .into_iter()
        .flatten()
        .collect();

        patterns.sort_by(|a, b| b.strength.total_cmp(&a.strength));

        debug!(days = series.len(), detected = patterns.len(), "patterns detected");
        patterns
    }

    /// 스마트 머니 매집.
    pub fn detect_accumulation(&self, series: &[DailyFlow]) -> Option<DetectedPattern> {
        self.evaluate(&self.accumulation_rule(), series)
    }

    /// 스마트 머니 분산.
    pub fn detect_distribution(&self, series: &[DailyFlow]) -> Option<DetectedPattern> {
        self.evaluate(&self.distribution_rule(), series)
    }

    /// 스마트 머니와 개인의 괴리.
    pub fn detect_divergence(&self, series: &[DailyFlow]) -> Option<DetectedPattern> {
        self.evaluate(&self.divergence_rule(), series)
    }

    /// 개인 추격 매수.
    pub fn detect_fomo(&self, series: &[DailyFlow]) -> Option<DetectedPattern> {
        self.evaluate(&self.fomo_rule(), series)
    }

    /// 개인 투매.
    pub fn detect_panic(&self, series: &[DailyFlow]) -> Option<DetectedPattern> {
        self.evaluate(&self.panic_rule(), series)
    }

    /// 스마트 머니 방향 전환.
    ///
    /// `reversal_prior_run`일 이상 이어진 구간 직후 반대 방향으로 돌아서고,
    /// 새 방향이 `reversal_min_flow` 초과 수급으로 `min_run`일 이상 유지되어야 합니다.
    pub fn detect_reversal(&self, series: &[DailyFlow]) -> Option<DetectedPattern> {
        let rule = self.reversal_rule();
        let nets: Vec<Decimal> = series.iter().map(DailyFlow::smart_money_net).collect();
        let segments = sign_segments(&nets);

        for pair in segments.windows(2).rev() {
            let (prior_sign, prior) = &pair[0];
            let (sign, current) = &pair[1];
            if prior_sign == sign
                || prior.end != current.start
                || prior.len() < self.config.reversal_prior_run
            {
                continue;
            }

            let held = series[current.clone()]
                .iter()
                .take_while(|day| (rule.qualifies)(day))
                .count();
            if held == 0 || held < rule.settings.min_run {
                continue;
            }

            return self.build_pattern(&rule, &series[current.start..current.start + held]);
        }

        None
    }

    fn evaluate(&self, rule: &RunRule<'_>, series: &[DailyFlow]) -> Option<DetectedPattern> {
        let range = rule.latest_run(series)?;
        self.build_pattern(rule, &series[range])
    }

    fn build_pattern(&self, rule: &RunRule<'_>, window: &[DailyFlow]) -> Option<DetectedPattern> {
        let first = window.first()?;
        let last = window.last()?;

        let total_flow = rule.total_flow(window);
        let days = window.len();
        let settings = rule.settings;
        let strength = (days as f64 * settings.strength_weight
            + total_flow.abs().to_f64().unwrap_or(0.0) / settings.flow_scale)
            .clamp(0.0, 100.0);

        let participant_roles = assign_participant_roles(
            window,
            signum(total_flow),
            settings.participation_threshold,
            self.config.driving_share,
        );
        let (description, insight) = narrative(rule.pattern_type, days, total_flow);

        debug!(
            pattern = %rule.pattern_type,
            days,
            %total_flow,
            strength,
            "pattern found"
        );

        Some(DetectedPattern {
            pattern_type: rule.pattern_type,
            description,
            start_date: first.date,
            end_date: last.date,
            strength,
            involved_categories: involved_categories(&participant_roles),
            consecutive_days: days,
            total_flow,
            action: rule.guidance.action,
            risk_level: rule.guidance.risk_level,
            insight,
            participant_roles,
        })
    }

    // ==================== 규칙 ====================

    fn accumulation_rule(&self) -> RunRule<'_> {
        RunRule {
            pattern_type: PatternType::Accumulation,
            qualifies: Box::new(|day: &DailyFlow| day.smart_money_net() > Decimal::ZERO),
            measured_flow: DailyFlow::smart_money_net,
            settings: &self.config.accumulation,
            guidance: Guidance {
                action: PatternAction::Accumulate,
                risk_level: RiskLevel::Low,
            },
        }
    }

    fn distribution_rule(&self) -> RunRule<'_> {
        RunRule {
            pattern_type: PatternType::Distribution,
            qualifies: Box::new(|day: &DailyFlow| day.smart_money_net() < Decimal::ZERO),
            measured_flow: DailyFlow::smart_money_net,
            settings: &self.config.distribution,
            guidance: Guidance {
                action: PatternAction::Reduce,
                risk_level: RiskLevel::High,
            },
        }
    }

    fn divergence_rule(&self) -> RunRule<'_> {
        let min_flow = self.config.divergence_min_flow;
        RunRule {
            pattern_type: PatternType::Divergence,
            qualifies: Box::new(move |day: &DailyFlow| {
                let Some(retail) = day.retail.as_ref() else {
                    return false;
                };
                let smart = day.smart_money_net();
                smart.abs() > min_flow
                    && retail.net.abs() > min_flow
                    && signum(smart) == -signum(retail.net)
            }),
            measured_flow: DailyFlow::smart_money_net,
            settings: &self.config.divergence,
            guidance: Guidance {
                action: PatternAction::FollowSmartMoney,
                risk_level: RiskLevel::Medium,
            },
        }
    }

    fn fomo_rule(&self) -> RunRule<'_> {
        let extreme = self.config.retail_extreme_flow;
        RunRule {
            pattern_type: PatternType::Fomo,
            qualifies: Box::new(move |day: &DailyFlow| {
                day.retail.as_ref().is_some_and(|r| r.net > extreme)
            }),
            measured_flow: retail_net,
            settings: &self.config.fomo,
            guidance: Guidance {
                action: PatternAction::TakeProfit,
                risk_level: RiskLevel::High,
            },
        }
    }

    fn panic_rule(&self) -> RunRule<'_> {
        let extreme = self.config.retail_extreme_flow;
        RunRule {
            pattern_type: PatternType::Panic,
            qualifies: Box::new(move |day: &DailyFlow| {
                day.retail.as_ref().is_some_and(|r| r.net < -extreme)
            }),
            measured_flow: retail_net,
            settings: &self.config.panic,
            guidance: Guidance {
                action: PatternAction::WatchForRebound,
                risk_level: RiskLevel::Medium,
            },
        }
    }

    fn reversal_rule(&self) -> RunRule<'_> {
        let min_flow = self.config.reversal_min_flow;
        RunRule {
            pattern_type: PatternType::Reversal,
            qualifies: Box::new(move |day: &DailyFlow| day.smart_money_net().abs() > min_flow),
            measured_flow: DailyFlow::smart_money_net,
            settings: &self.config.reversal,
            guidance: Guidance {
                action: PatternAction::ReassessPosition,
                risk_level: RiskLevel::Medium,
            },
        }
    }
}

fn retail_net(day: &DailyFlow) -> Decimal {
    day.net(InvestorCategory::Retail)
}

/// 패턴 설명과 해석 문구.
fn narrative(pattern_type: PatternType, days: usize, total_flow: Decimal) -> (String, String) {
    let amount = total_flow.abs().round_dp(0);
    let buying = total_flow > Decimal::ZERO;

    match pattern_type {
        PatternType::Accumulation => (
            format!("Smart money net buying for {} consecutive days", days),
            format!(
                "Foreign and institutional investors accumulated {} M THB; sustained buying tends to support prices",
                amount
            ),
        ),
        PatternType::Distribution => (
            format!("Smart money net selling for {} consecutive days", days),
            format!(
                "Foreign and institutional investors distributed {} M THB; consider reducing exposure",
                amount
            ),
        ),
        PatternType::Divergence if buying => (
            format!("Smart money buying while retail sells for {} days", days),
            format!(
                "Smart money absorbed {} M THB of retail supply; follow the buy side",
                amount
            ),
        ),
        PatternType::Divergence => (
            format!("Smart money selling while retail buys for {} days", days),
            format!(
                "Retail investors absorbed {} M THB of smart money supply; treat rallies with caution",
                amount
            ),
        ),
        PatternType::Fomo => (
            format!("Retail investors chasing the market for {} days", days),
            format!(
                "Heavy retail buying of {} M THB often marks a short-term top; consider taking profit",
                amount
            ),
        ),
        PatternType::Panic => (
            format!("Retail investors panic selling for {} days", days),
            format!(
                "Retail capitulation of {} M THB can precede a rebound",
                amount
            ),
        ),
        PatternType::Reversal if buying => (
            format!("Smart money turned to net buying {} days ago", days),
            format!(
                "Prior selling streak ended with {} M THB of new buying; reassess short positions",
                amount
            ),
        ),
        PatternType::Reversal => (
            format!("Smart money turned to net selling {} days ago", days),
            format!(
                "Prior buying streak ended with {} M THB of new selling; reassess long positions",
                amount
            ),
        ),
    }
}
