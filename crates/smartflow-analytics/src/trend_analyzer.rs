//! 투자자 유형별 수급 추세 분석기.
//!
//! 시간순 일간 수급을 차트용 포인트로 변환하고, 기간 집계와
//! OLS 기반 추세 방향/강도, 이동평균을 계산합니다.
//!
//! # 추세 판정
//!
//! 순매수를 일자 인덱스(0, 1, 2, ...)에 대해 선형회귀합니다.
//! - 기울기 > 50 → Up, < -50 → Down, 그 외 Sideways
//! - 강도 = R² × 100 (포인트 3개 미만이거나 Sideways면 50)

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use smartflow_core::{
    AggregatedMetrics, DailyFlow, DailyTrendPoint, DatedValue, InvestorCategory, InvestorTrend,
    MovingAverages, TrendConfig, TrendDirection,
};
use tracing::debug;

/// 선형회귀 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Regression {
    slope: f64,
    r_squared: f64,
}

/// 추세 분석기.
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// 새 분석기 생성.
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// 한 투자자 유형의 추세 분석.
    ///
    /// 해당 유형 데이터가 없는 날은 건너뜁니다.
    pub fn convert_to_investor_trend(
        &self,
        series: &[DailyFlow],
        category: InvestorCategory,
    ) -> InvestorTrend {
        let points: Vec<DailyTrendPoint> = series
            .iter()
            .filter_map(|day| day.get(category).map(|record| (day.date, record)))
            .map(|(date, record)| {
                let total = record.total();
                DailyTrendPoint {
                    date,
                    timestamp: day_timestamp_millis(date),
                    buy: record.buy,
                    sell: record.sell,
                    net: record.net,
                    buy_pct: share_pct(record.buy, total),
                    sell_pct: share_pct(record.sell, total),
                }
            })
            .collect();

        let metrics = self.calculate_aggregated_metrics(&points);
        let nets: Vec<Decimal> = points.iter().map(|p| p.net).collect();
        let moving_averages = MovingAverages {
            ma3: simple_moving_average(&nets, 3),
            ma5: simple_moving_average(&nets, 5),
            ma10: simple_moving_average(&nets, 10),
        };

        let latest_vs_average_pct = match nets.last() {
            Some(latest) if !metrics.avg_daily.is_zero() => {
                ((*latest - metrics.avg_daily) / metrics.avg_daily.abs() * Decimal::ONE_HUNDRED)
                    .round_dp(2)
            }
            _ => Decimal::ZERO,
        };

        debug!(
            %category,
            days = points.len(),
            direction = %metrics.trend_direction,
            strength = metrics.trend_strength,
            "investor trend converted"
        );

        InvestorTrend {
            category,
            points,
            metrics,
            moving_averages,
            latest_vs_average_pct,
        }
    }

    /// 시계열에 존재하는 모든 투자자 유형의 추세.
    ///
    /// 외국인/기관은 항상 포함되며, 개인/자기매매는 하루라도 데이터가 있을 때만 포함됩니다.
    pub fn analyze_all(&self, series: &[DailyFlow]) -> Vec<InvestorTrend> {
        InvestorCategory::ALL
            .into_iter()
            .filter(|category| {
                category.is_smart_money() || series.iter().any(|day| day.get(*category).is_some())
            })
            .map(|category| self.convert_to_investor_trend(series, category))
            .collect()
    }

    /// 기간 집계 지표 계산.
    ///
    /// 빈 입력이면 기본값(합계 0, Sideways, 강도 50)을 반환합니다.
    pub fn calculate_aggregated_metrics(&self, points: &[DailyTrendPoint]) -> AggregatedMetrics {
        if points.is_empty() {
            return AggregatedMetrics {
                trend_strength: self.config.neutral_strength,
                ..Default::default()
            };
        }

        let total_buy: Decimal = points.iter().map(|p| p.buy).sum();
        let total_sell: Decimal = points.iter().map(|p| p.sell).sum();
        let total_net: Decimal = points.iter().map(|p| p.net).sum();
        let avg_daily = total_net / Decimal::from(points.len());

        // 동률이면 먼저 나온 날 유지
        let mut max_buy: Option<DatedValue> = None;
        let mut max_sell: Option<DatedValue> = None;
        for point in points {
            if max_buy.as_ref().map_or(true, |m| point.buy > m.value) {
                max_buy = Some(DatedValue { date: point.date, value: point.buy });
            }
            if max_sell.as_ref().map_or(true, |m| point.sell > m.value) {
                max_sell = Some(DatedValue { date: point.date, value: point.sell });
            }
        }

        let values: Vec<f64> = points.iter().map(|p| p.net.to_f64().unwrap_or(0.0)).collect();
        let regression = linear_regression(&values);
        let trend_direction = self.direction_from_slope(regression.slope);
        let trend_strength = self.strength_from(values.len(), trend_direction, regression);

        AggregatedMetrics {
            total_buy,
            total_sell,
            total_net,
            avg_daily,
            max_buy,
            max_sell,
            trend_direction,
            trend_strength,
            std_dev: population_std_dev(&values),
        }
    }

    /// 순매수 시계열의 추세 강도 (0 ~ 100).
    pub fn calculate_trend_strength(&self, nets: &[Decimal]) -> f64 {
        let values: Vec<f64> = nets.iter().map(|n| n.to_f64().unwrap_or(0.0)).collect();
        let regression = linear_regression(&values);
        let direction = self.direction_from_slope(regression.slope);
        self.strength_from(values.len(), direction, regression)
    }

    fn direction_from_slope(&self, slope: f64) -> TrendDirection {
        if slope > self.config.slope_threshold {
            TrendDirection::Up
        } else if slope < -self.config.slope_threshold {
            TrendDirection::Down
        } else {
            TrendDirection::Sideways
        }
    }

    fn strength_from(&self, len: usize, direction: TrendDirection, regression: Regression) -> f64 {
        if len < self.config.min_points || direction == TrendDirection::Sideways {
            return self.config.neutral_strength;
        }
        (regression.r_squared * 100.0).clamp(0.0, 100.0)
    }
}

/// 일자 인덱스에 대한 최소제곱 선형회귀.
///
/// y = a + b*x, b = Σ[(x - x̄)(y - ȳ)] / Σ[(x - x̄)²]
///
/// x 또는 y의 분산이 0이면 기울기와 R² 모두 0입니다.
fn linear_regression(values: &[f64]) -> Regression {
    let flat = Regression { slope: 0.0, r_squared: 0.0 };
    if values.len() < 2 {
        return flat;
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x_diff = i as f64 - x_mean;
        let y_diff = y - y_mean;
        sxy += x_diff * y_diff;
        sxx += x_diff * x_diff;
        syy += y_diff * y_diff;
    }

    if sxx == 0.0 || syy == 0.0 {
        return flat;
    }

    Regression {
        slope: sxy / sxx,
        r_squared: (sxy * sxy) / (sxx * syy),
    }
}

/// 모표준편차.
fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// 최근 `period`일 단순이동평균. 데이터가 부족하면 `None`.
fn simple_moving_average(nets: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || nets.len() < period {
        return None;
    }
    let window = &nets[nets.len() - period..];
    Some(window.iter().sum::<Decimal>() / Decimal::from(period))
}

fn share_pct(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (part / total * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

fn day_timestamp_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use smartflow_core::FlowRecord;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn series(foreign: &[(Decimal, Decimal)]) -> Vec<DailyFlow> {
        foreign
            .iter()
            .enumerate()
            .map(|(i, (buy, sell))| {
                DailyFlow::new(
                    date(i as u32 + 1),
                    FlowRecord::from_buy_sell(*buy, *sell),
                    FlowRecord::from_net(Decimal::ZERO),
                )
            })
            .collect()
    }

    // ==================== 강도 ====================

    #[test]
    fn test_strength_short_input_is_neutral() {
        let analyzer = TrendAnalyzer::default();
        assert_eq!(analyzer.calculate_trend_strength(&[]), 50.0);
        assert_eq!(analyzer.calculate_trend_strength(&[dec!(1000)]), 50.0);
        assert_eq!(analyzer.calculate_trend_strength(&[dec!(0), dec!(500)]), 50.0);
    }

    #[test]
    fn test_strength_perfect_line() {
        let analyzer = TrendAnalyzer::default();
        let strength =
            analyzer.calculate_trend_strength(&[dec!(100), dec!(200), dec!(300), dec!(400)]);
        assert!((strength - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_strength_sideways_is_neutral() {
        let analyzer = TrendAnalyzer::default();
        // 기울기 10 → Sideways
        let strength = analyzer.calculate_trend_strength(&[dec!(100), dec!(110), dec!(120)]);
        assert_eq!(strength, 50.0);
    }

    #[test]
    fn test_regression_zero_variance_guard() {
        let flat = linear_regression(&[300.0, 300.0, 300.0]);
        assert_eq!(flat.slope, 0.0);
        assert_eq!(flat.r_squared, 0.0);
    }

    #[test]
    fn test_regression_noisy_line() {
        // 0, 200, 100, 300: 기울기 80, R² = 0.64
        let reg = linear_regression(&[0.0, 200.0, 100.0, 300.0]);
        assert!((reg.slope - 80.0).abs() < 1e-9);
        assert!((reg.r_squared - 0.64).abs() < 1e-9);
    }

    // ==================== 집계 ====================

    #[test]
    fn test_aggregated_metrics() {
        let analyzer = TrendAnalyzer::default();
        let trend = analyzer.convert_to_investor_trend(
            &series(&[
                (dec!(1000), dec!(900)),
                (dec!(1200), dec!(1000)),
                (dec!(1200), dec!(900)),
                (dec!(1100), dec!(700)),
            ]),
            InvestorCategory::Foreign,
        );
        let m = &trend.metrics;

        assert_eq!(m.total_buy, dec!(4500));
        assert_eq!(m.total_sell, dec!(3500));
        assert_eq!(m.total_net, dec!(1000));
        assert_eq!(m.avg_daily, dec!(250));
        // 최대 매수 1200 동률 → 먼저 나온 3월 2일
        assert_eq!(m.max_buy.as_ref().unwrap().date, date(2));
        assert_eq!(m.max_sell.as_ref().unwrap().value, dec!(1000));
        // 순매수 100, 200, 300, 400
        assert_eq!(m.trend_direction, TrendDirection::Up);
        assert!((m.trend_strength - 100.0).abs() < 1e-9);
        // 모표준편차 = sqrt(12500)
        assert!((m.std_dev - 12500f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_downtrend_direction() {
        let analyzer = TrendAnalyzer::default();
        let trend = analyzer.convert_to_investor_trend(
            &series(&[
                (dec!(500), dec!(100)),
                (dec!(500), dec!(300)),
                (dec!(500), dec!(500)),
            ]),
            InvestorCategory::Foreign,
        );
        assert_eq!(trend.metrics.trend_direction, TrendDirection::Down);
    }

    #[test]
    fn test_empty_series_defaults() {
        let analyzer = TrendAnalyzer::default();
        let metrics = analyzer.calculate_aggregated_metrics(&[]);
        assert_eq!(metrics.total_net, Decimal::ZERO);
        assert_eq!(metrics.trend_direction, TrendDirection::Sideways);
        assert_eq!(metrics.trend_strength, 50.0);
        assert!(metrics.max_buy.is_none());
    }

    // ==================== 포인트 / 이동평균 ====================

    #[test]
    fn test_points_percentages_and_timestamp() {
        let analyzer = TrendAnalyzer::default();
        let trend = analyzer.convert_to_investor_trend(
            &series(&[(dec!(200), dec!(100)), (dec!(0), dec!(0))]),
            InvestorCategory::Foreign,
        );

        let first = &trend.points[0];
        assert_eq!(first.buy_pct, dec!(66.67));
        assert_eq!(first.sell_pct, dec!(33.33));
        // 2024-03-01 00:00:00 UTC
        assert_eq!(first.timestamp, 1_709_251_200_000);

        let second = &trend.points[1];
        assert_eq!(second.buy_pct, Decimal::ZERO);
        assert_eq!(second.sell_pct, Decimal::ZERO);
    }

    #[test]
    fn test_moving_averages_use_latest_window() {
        let analyzer = TrendAnalyzer::default();
        let days: Vec<(Decimal, Decimal)> = (1..=6)
            .map(|i| (Decimal::from(i * 100), Decimal::ZERO))
            .collect();
        let trend = analyzer.convert_to_investor_trend(&series(&days), InvestorCategory::Foreign);

        assert_eq!(trend.moving_averages.ma3, Some(dec!(500)));
        assert_eq!(trend.moving_averages.ma5, Some(dec!(400)));
        assert_eq!(trend.moving_averages.ma10, None);
        // 평균 350, 최근 600 → +71.43%
        assert_eq!(trend.latest_vs_average_pct, dec!(71.43));
    }

    #[test]
    fn test_analyze_all_skips_missing_categories() {
        let analyzer = TrendAnalyzer::default();
        let mut days = series(&[(dec!(100), dec!(50)), (dec!(100), dec!(50))]);
        days[1] = days[1].clone().with_retail(FlowRecord::from_net(dec!(-70)));

        let trends = analyzer.analyze_all(&days);
        let categories: Vec<InvestorCategory> = trends.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![InvestorCategory::Foreign, InvestorCategory::Institution, InvestorCategory::Retail]
        );
        assert_eq!(trends[2].points.len(), 1);
    }
}
