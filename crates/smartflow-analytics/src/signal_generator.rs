//! 종합 신호 및 리스크 레짐 생성기.
//!
//! 외국인/기관 수급과 종합 점수로부터 다음을 생성합니다:
//! - 종합 신호 (StrongBuy ~ StrongSell)
//! - Risk-On/Off 레짐
//! - 점수 기반 스마트 머니 신호와 근거 문구
//! - 수급 주도 세력
//! - 대시보드용 관찰 문구

use rust_decimal::Decimal;
use smartflow_core::{
    CombinedSignal, CompositeScoreComponents, FlowDirection, InvestorAnalysis, InvestorCategory,
    PrimaryDriver, RiskSignal, SignalConfig, SmartMoneySignal,
};
use tracing::debug;

/// 신호 생성기.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    /// 새 생성기 생성.
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// 외국인 + 기관 순매수 합계로 종합 신호 판정.
    ///
    /// # 판정 로직
    ///
    /// 1. 합계 >= 600 → StrongBuy, <= -600 → StrongSell
    /// 2. 두 주체가 반대 방향이 아니면: 합계 >= 100 → Buy, <= -100 → Sell
    /// 3. 그 외: 두 주체 모두 순매수면 Buy, 모두 순매도면 Sell, 아니면 Neutral
    pub fn generate_combined_signal(
        &self,
        foreign: &InvestorAnalysis,
        institution: &InvestorAnalysis,
    ) -> CombinedSignal {
        let total_net = foreign.today_net + institution.today_net;
        let strong = self.config.combined_strong_threshold;
        let moderate = self.config.combined_threshold;

        if total_net >= strong {
            return CombinedSignal::StrongBuy;
        }
        if total_net <= -strong {
            return CombinedSignal::StrongSell;
        }

        let (foreign_dir, institution_dir) = (foreign.direction(), institution.direction());
        if !foreign_dir.conflicts_with(institution_dir) {
            if total_net >= moderate {
                return CombinedSignal::Buy;
            }
            if total_net <= -moderate {
                return CombinedSignal::Sell;
            }
        }

        match (foreign_dir, institution_dir) {
            (FlowDirection::Bullish, FlowDirection::Bullish) => CombinedSignal::Buy,
            (FlowDirection::Bearish, FlowDirection::Bearish) => CombinedSignal::Sell,
            _ => CombinedSignal::Neutral,
        }
    }

    /// 종합 점수와 종합 신호를 함께 보고 Risk-On/Off 판정.
    ///
    /// | 조건                          | 결과        |
    /// |-------------------------------|-------------|
    /// | 점수 >= 70 AND StrongBuy      | RiskOn      |
    /// | 점수 >= 60 AND Buy            | RiskOnMild  |
    /// | 점수 <= 30 AND StrongSell     | RiskOff     |
    /// | 점수 <= 40 AND Sell           | RiskOffMild |
    /// | 그 외                         | Neutral     |
    pub fn generate_risk_on_off_signal(
        &self,
        signal: CombinedSignal,
        scores: &CompositeScoreComponents,
    ) -> RiskSignal {
        let c = &self.config;
        let score = scores.total_score;

        match signal {
            CombinedSignal::StrongBuy if score >= c.risk_on_score => RiskSignal::RiskOn,
            CombinedSignal::Buy if score >= c.risk_on_mild_score => RiskSignal::RiskOnMild,
            CombinedSignal::StrongSell if score <= c.risk_off_score => RiskSignal::RiskOff,
            CombinedSignal::Sell if score <= c.risk_off_mild_score => RiskSignal::RiskOffMild,
            _ => RiskSignal::Neutral,
        }
    }

    /// 종합 점수만으로 신호와 리스크를 재산출하고 근거 문구를 붙입니다.
    pub fn generate_smart_money_signal(
        &self,
        scores: &CompositeScoreComponents,
        confidence: f64,
    ) -> SmartMoneySignal {
        let c = &self.config;
        let score = scores.total_score;

        let (signal, risk_signal) = if score >= c.strong_buy_score {
            (CombinedSignal::StrongBuy, RiskSignal::RiskOn)
        } else if score >= c.buy_score {
            (CombinedSignal::Buy, RiskSignal::RiskOnMild)
        } else if score <= c.strong_sell_score {
            (CombinedSignal::StrongSell, RiskSignal::RiskOff)
        } else if score <= c.sell_score {
            (CombinedSignal::Sell, RiskSignal::RiskOffMild)
        } else {
            (CombinedSignal::Neutral, RiskSignal::Neutral)
        };

        SmartMoneySignal {
            signal,
            risk_signal,
            confidence: confidence.clamp(0.0, 100.0),
            evidence: self.collect_evidence(scores),
        }
    }

    /// 투자자 유형별 점수 구간에서 근거 문구 생성 (최대 3개).
    fn collect_evidence(&self, scores: &CompositeScoreComponents) -> Vec<String> {
        let mut evidence = Vec::new();

        // 외국인/기관: 0 ~ 50, 개인/자기매매: 0 ~ 25
        if scores.foreign_score >= 40.0 {
            evidence.push("Foreign investors show strong buying conviction".to_string());
        } else if scores.foreign_score <= 10.0 {
            evidence.push("Foreign investors are applying heavy selling pressure".to_string());
        }

        if scores.institution_score >= 40.0 {
            evidence.push("Institutional investors are accumulating".to_string());
        } else if scores.institution_score <= 10.0 {
            evidence.push("Institutional investors are distributing".to_string());
        }

        if scores.retail_score >= 10.0 {
            evidence.push("Retail buying confirms the smart money move".to_string());
        }
        if scores.prop_score >= 10.0 {
            evidence.push("Proprietary desks are positioned on the buy side".to_string());
        }

        if evidence.is_empty() {
            evidence.push(format!(
                "Composite smart money score is balanced at {:.1}",
                scores.total_score
            ));
        }

        evidence.truncate(self.config.max_evidence);
        evidence
    }

    /// 수급 주도 세력 판정.
    ///
    /// 1. 외국인/기관이 모두 Strong 단계이고 같은 방향이면 `Both`
    /// 2. |순매수| 1위가 2위의 1.5배 이상이면 해당 유형
    /// 3. 1위가 500 미만이면 `None`
    /// 4. 그 외에는 1위 유형
    pub fn detect_primary_driver(
        &self,
        foreign: &InvestorAnalysis,
        institution: &InvestorAnalysis,
        retail: Option<&InvestorAnalysis>,
        prop: Option<&InvestorAnalysis>,
    ) -> PrimaryDriver {
        let f = foreign.signal_strength;
        let i = institution.signal_strength;
        if f.is_strong() && i.is_strong() && f.sign() == i.sign() {
            return PrimaryDriver::Both;
        }

        let mut magnitudes: Vec<(InvestorCategory, Decimal)> =
            [Some(foreign), Some(institution), retail, prop]
                .into_iter()
                .flatten()
                .map(|a| (a.category, a.today_net.abs()))
                .collect();
        // 동률이면 입력 순서 유지 (외국인 우선)
        magnitudes.sort_by(|a, b| b.1.cmp(&a.1));

        let (top_category, top) = magnitudes[0];
        let second = magnitudes.get(1).map(|(_, m)| *m).unwrap_or(Decimal::ZERO);

        let driver = if top > Decimal::ZERO && top >= second * self.config.driver_dominance_ratio {
            PrimaryDriver::from(top_category)
        } else if top < self.config.driver_min_flow {
            PrimaryDriver::None
        } else {
            PrimaryDriver::from(top_category)
        };

        debug!(%driver, %top, %second, "primary driver detected");
        driver
    }

    /// 대시보드용 관찰 문구 (수급 규모 순, 최대 4개).
    pub fn generate_smart_money_observations(
        &self,
        foreign: &InvestorAnalysis,
        institution: &InvestorAnalysis,
        retail: Option<&InvestorAnalysis>,
        prop: Option<&InvestorAnalysis>,
    ) -> Vec<String> {
        // (우선순위, 문구)
        let mut candidates: Vec<(Decimal, String)> = Vec::new();

        for analysis in [foreign, institution] {
            if let Some(text) = describe_flow(analysis) {
                candidates.push((analysis.today_net.abs(), text));
            }
            if analysis.flow_trend.is_accelerating() {
                let side = if analysis.today_net > Decimal::ZERO { "buying" } else { "selling" };
                candidates.push((
                    analysis.vs_average.abs(),
                    format!(
                        "{} {} is accelerating ({} M THB vs 5-day average)",
                        analysis.category.label(),
                        side,
                        analysis.vs_average.round_dp(0)
                    ),
                ));
            }
        }

        let smart_total = foreign.today_net + institution.today_net;
        if foreign.signal_strength.is_buy() && institution.signal_strength.is_buy() {
            candidates.push((
                smart_total.abs(),
                format!(
                    "Foreign and institutional investors are buying together ({} M THB)",
                    smart_total.round_dp(0)
                ),
            ));
        } else if foreign.signal_strength.is_sell() && institution.signal_strength.is_sell() {
            candidates.push((
                smart_total.abs(),
                format!(
                    "Foreign and institutional investors are selling together ({} M THB)",
                    smart_total.abs().round_dp(0)
                ),
            ));
        }

        if let Some(retail) = retail {
            let smart_dir = FlowDirection::from_net(smart_total);
            if retail.signal_strength.is_strong() || retail.signal_strength.is_moderate() {
                let text = if retail.direction().conflicts_with(smart_dir) {
                    format!(
                        "Retail investors are trading against smart money ({} M THB)",
                        retail.today_net.round_dp(0)
                    )
                } else {
                    describe_flow(retail).unwrap_or_default()
                };
                if !text.is_empty() {
                    candidates.push((retail.today_net.abs(), text));
                }
            }
        }

        if let Some(prop) = prop {
            let net = prop.today_net;
            let easing = -self.config.prop_easing_threshold;
            if net < Decimal::ZERO && net > easing {
                // 소규모 순매도는 매도 물량 축소로 해석 (약한 강세)
                candidates.push((
                    net.abs(),
                    "Proprietary desks are reducing sell volume (mildly bullish)".to_string(),
                ));
            } else if let Some(text) = describe_flow(prop) {
                candidates.push((net.abs(), text));
            }
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        candidates
            .into_iter()
            .map(|(_, text)| text)
            .take(self.config.max_observations)
            .collect()
    }
}

/// 강도 단계에 따른 기본 문구. 중립이면 `None`.
fn describe_flow(analysis: &InvestorAnalysis) -> Option<String> {
    let label = analysis.category.label();
    let amount = analysis.today_net.abs().round_dp(0);
    let strength = analysis.signal_strength;

    let text = if strength.is_strong() && strength.is_buy() {
        format!("{} bought heavily ({} M THB net)", label, amount)
    } else if strength.is_strong() {
        format!("{} sold heavily ({} M THB net)", label, amount)
    } else if strength.is_buy() {
        format!("{} are net buyers ({} M THB)", label, amount)
    } else if strength.is_sell() {
        format!("{} are net sellers ({} M THB)", label, amount)
    } else {
        return None;
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use smartflow_core::{FlowTrend, SignalStrength};

    use crate::classifier::FlowClassifier;

    fn analysis(category: InvestorCategory, net: Decimal) -> InvestorAnalysis {
        let classifier = FlowClassifier::default();
        InvestorAnalysis {
            category,
            today_net: net,
            signal_strength: classifier.classify_signal_strength(net),
            flow_trend: classifier.detect_flow_trend(net, &[]),
            confidence: 50.0,
            trend_5day: Decimal::ZERO,
            avg_5day: Decimal::ZERO,
            vs_average: net,
        }
    }

    fn scores(total: f64) -> CompositeScoreComponents {
        CompositeScoreComponents {
            foreign_score: 25.0,
            institution_score: 25.0,
            retail_score: 0.0,
            prop_score: 0.0,
            total_score: total,
        }
    }

    #[test]
    fn test_combined_signal_thresholds() {
        let gen = SignalGenerator::default();
        let f = |n| analysis(InvestorCategory::Foreign, n);
        let i = |n| analysis(InvestorCategory::Institution, n);
        let combined = |f_net, i_net| gen.generate_combined_signal(&f(f_net), &i(i_net));

        assert_eq!(combined(dec!(600), dec!(500)), CombinedSignal::StrongBuy);
        assert_eq!(combined(dec!(300), dec!(300)), CombinedSignal::StrongBuy);
        assert_eq!(combined(dec!(300), dec!(299)), CombinedSignal::Buy);
        assert_eq!(combined(dec!(-300), dec!(-300)), CombinedSignal::StrongSell);
        assert_eq!(combined(dec!(-50), dec!(-50)), CombinedSignal::Sell);
    }

    #[test]
    fn test_combined_signal_falls_back_to_direction() {
        let gen = SignalGenerator::default();
        let f = |n| analysis(InvestorCategory::Foreign, n);
        let i = |n| analysis(InvestorCategory::Institution, n);
        let combined = |f_net, i_net| gen.generate_combined_signal(&f(f_net), &i(i_net));

        assert_eq!(combined(dec!(40), dec!(30)), CombinedSignal::Buy);
        assert_eq!(combined(dec!(-40), dec!(-30)), CombinedSignal::Sell);
        // 외국인 -600, 기관 +50: 방향 충돌 → Neutral
        assert_eq!(combined(dec!(-600), dec!(50)), CombinedSignal::Neutral);
        assert_eq!(combined(dec!(300), dec!(-150)), CombinedSignal::Neutral);
        // 한쪽이 0이면 충돌 아님
        assert_eq!(combined(dec!(-550), Decimal::ZERO), CombinedSignal::Sell);
        assert_eq!(combined(dec!(90), dec!(-40)), CombinedSignal::Neutral);
    }

    #[test]
    fn test_risk_on_off_table() {
        let gen = SignalGenerator::default();
        let risk = |signal, total| gen.generate_risk_on_off_signal(signal, &scores(total));
        assert_eq!(risk(CombinedSignal::StrongBuy, 70.0), RiskSignal::RiskOn);
        assert_eq!(risk(CombinedSignal::StrongBuy, 69.0), RiskSignal::Neutral);
        assert_eq!(risk(CombinedSignal::Buy, 60.0), RiskSignal::RiskOnMild);
        assert_eq!(risk(CombinedSignal::Buy, 80.0), RiskSignal::RiskOnMild);
        assert_eq!(risk(CombinedSignal::StrongSell, 30.0), RiskSignal::RiskOff);
        assert_eq!(risk(CombinedSignal::Sell, 40.0), RiskSignal::RiskOffMild);
        assert_eq!(risk(CombinedSignal::Sell, 41.0), RiskSignal::Neutral);
        assert_eq!(risk(CombinedSignal::Neutral, 90.0), RiskSignal::Neutral);
    }

    #[test]
    fn test_smart_money_signal_bands() {
        let gen = SignalGenerator::default();
        let cases = [
            (75.0, CombinedSignal::StrongBuy, RiskSignal::RiskOn),
            (55.0, CombinedSignal::Buy, RiskSignal::RiskOnMild),
            (50.0, CombinedSignal::Neutral, RiskSignal::Neutral),
            (45.0, CombinedSignal::Sell, RiskSignal::RiskOffMild),
            (30.0, CombinedSignal::StrongSell, RiskSignal::RiskOff),
        ];
        for (total, signal, risk) in cases {
            let result = gen.generate_smart_money_signal(&scores(total), 64.0);
            assert_eq!(result.signal, signal, "total={}", total);
            assert_eq!(result.risk_signal, risk, "total={}", total);
            assert_eq!(result.confidence, 64.0);
        }
    }

    #[test]
    fn test_evidence_is_limited_to_three() {
        let gen = SignalGenerator::default();
        let scores = CompositeScoreComponents {
            foreign_score: 50.0,
            institution_score: 45.0,
            retail_score: 12.0,
            prop_score: 12.0,
            total_score: 85.0,
        };
        let result = gen.generate_smart_money_signal(&scores, 80.0);
        assert_eq!(result.evidence.len(), 3);
        assert!(result.evidence[0].starts_with("Foreign"));
    }

    #[test]
    fn test_evidence_never_empty() {
        let gen = SignalGenerator::default();
        let result = gen.generate_smart_money_signal(&scores(50.0), 50.0);
        assert_eq!(result.evidence.len(), 1);
        assert!(result.evidence[0].contains("balanced"));
    }

    #[test]
    fn test_primary_driver_both() {
        let gen = SignalGenerator::default();
        let driver = gen.detect_primary_driver(
            &analysis(InvestorCategory::Foreign, dec!(800)),
            &analysis(InvestorCategory::Institution, dec!(550)),
            None,
            None,
        );
        assert_eq!(driver, PrimaryDriver::Both);
    }

    #[test]
    fn test_primary_driver_dominant_category() {
        let gen = SignalGenerator::default();
        let retail = analysis(InvestorCategory::Retail, dec!(-1200));
        let driver = gen.detect_primary_driver(
            &analysis(InvestorCategory::Foreign, dec!(700)),
            &analysis(InvestorCategory::Institution, dec!(-600)),
            Some(&retail),
            None,
        );
        // 1200 >= 700 × 1.5 → 개인 주도
        assert_eq!(driver, PrimaryDriver::Retail);

        let driver = gen.detect_primary_driver(
            &analysis(InvestorCategory::Foreign, dec!(900)),
            &analysis(InvestorCategory::Institution, dec!(300)),
            None,
            None,
        );
        assert_eq!(driver, PrimaryDriver::Foreign);
    }

    #[test]
    fn test_primary_driver_none_below_floor() {
        let gen = SignalGenerator::default();
        let driver = gen.detect_primary_driver(
            &analysis(InvestorCategory::Foreign, dec!(300)),
            &analysis(InvestorCategory::Institution, dec!(-250)),
            None,
            None,
        );
        assert_eq!(driver, PrimaryDriver::None);
    }

    #[test]
    fn test_observations_ranked_and_limited() {
        let gen = SignalGenerator::default();
        let foreign = analysis(InvestorCategory::Foreign, dec!(900));
        let institution = analysis(InvestorCategory::Institution, dec!(300));
        let retail = analysis(InvestorCategory::Retail, dec!(-1100));
        let prop = analysis(InvestorCategory::Proprietary, dec!(-120));

        let obs = gen.generate_smart_money_observations(
            &foreign,
            &institution,
            Some(&retail),
            Some(&prop),
        );
        assert_eq!(obs.len(), 4);
        // 규모 1위: 외국인+기관 동반 매수 1200
        assert!(obs[0].contains("buying together"));
        assert!(obs[1].contains("against smart money"));
        assert!(obs[2].starts_with("Foreign investors bought heavily"));
        assert!(obs[3].starts_with("Institutional investors are net buyers"));
    }

    #[test]
    fn test_prop_small_selling_reads_as_easing() {
        let gen = SignalGenerator::default();
        let foreign = analysis(InvestorCategory::Foreign, dec!(20));
        let institution = analysis(InvestorCategory::Institution, dec!(10));
        let prop = analysis(InvestorCategory::Proprietary, dec!(-150));

        let obs = gen.generate_smart_money_observations(&foreign, &institution, None, Some(&prop));
        assert_eq!(
            obs,
            vec!["Proprietary desks are reducing sell volume (mildly bullish)".to_string()]
        );

        let heavy = analysis(InvestorCategory::Proprietary, dec!(-250));
        let obs = gen.generate_smart_money_observations(&foreign, &institution, None, Some(&heavy));
        assert_eq!(obs, vec!["Proprietary desks are net sellers (250 M THB)".to_string()]);
    }

    #[test]
    fn test_accelerating_observation() {
        let gen = SignalGenerator::default();
        let mut foreign = analysis(InvestorCategory::Foreign, dec!(400));
        foreign.flow_trend = FlowTrend::AcceleratingBuy;
        foreign.vs_average = dec!(250);
        foreign.signal_strength = SignalStrength::Buy;
        let institution = analysis(InvestorCategory::Institution, Decimal::ZERO);

        let obs = gen.generate_smart_money_observations(&foreign, &institution, None, None);
        assert!(obs.iter().any(|o| o.contains("buying is accelerating")));
    }
}
