//! 수급 분석 엔진의 에러 타입.
//!
//! 계산기 자체는 이력 부족이나 빈 입력에 대해 에러 대신 중립값으로 대체합니다.
//! 에러는 설정 로드/검증과 엔진 진입점의 입력 검증에서만 발생합니다.

use thiserror::Error;

/// 수급 분석 에러.
#[derive(Debug, Error)]
pub enum FlowError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 수급 분석 작업을 위한 Result 타입.
pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    /// 호출자가 입력을 고쳐서 다시 시도할 수 있는 에러인지 확인합니다.
    pub fn is_input_error(&self) -> bool {
        matches!(self, FlowError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for FlowError {
    fn from(err: toml::ser::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for FlowError {
    fn from(err: config::ConfigError) -> Self {
        FlowError::Config(err.to_string())
    }
}
