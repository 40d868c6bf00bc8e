//! 유효 설정 출력 명령.

use anyhow::{Context, Result};
use smartflow_core::AppConfig;

/// 파일 + 환경 변수가 적용된 최종 설정을 TOML로 반환.
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("설정을 TOML로 변환할 수 없습니다")
}
