//! tracing을 사용한 로깅 인프라.
//!
//! 분석 엔진은 라이브러리이므로 구독자를 직접 설치하지 않습니다.
//! CLI 등 실행 바이너리가 시작 시 [`init_logging`]을 한 번 호출합니다.
//! 레벨은 `RUST_LOG`가 있으면 그것을, 없으면 [`LogConfig::level`]을 사용합니다.
//!
//! - **pretty**: 개발용 사람이 읽기 쉬운 형식
//! - **json**: 로그 집계용 JSON 형식
//! - **compact**: 간결한 한 줄 형식

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::error::{FlowError, FlowResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식 (개발용)
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식
    Json,
    /// 간결한 한 줄 형식
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(FlowError::Config(format!("알 수 없는 로그 형식: {}", s))),
        }
    }
}

/// 로깅 설정 (`[logging]` 섹션).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "smartflow_analytics=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 분석 span 진입/종료 기록
    pub with_span_events: bool,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_span_events: false,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 주어진 레벨로 생성.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    fn env_filter(&self) -> FlowResult<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| {
                FlowError::Config(format!("로그 레벨 '{}' 해석 실패: {}", self.level, e))
            })
    }

    fn span_events(&self) -> FmtSpan {
        if self.with_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// 필터 다음에 붙는 출력 레이어.
type FormatLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// 로깅 시스템 초기화.
///
/// 로그는 표준 에러로 출력되므로 표준 출력의 JSON 결과와 섞이지 않습니다.
/// 구독자가 이미 설치되어 있으면 [`FlowError::Internal`]을 반환합니다.
///
/// # 예제
///
/// ```no_run
/// use smartflow_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let config = LogConfig::new("smartflow_analytics=debug").with_format(LogFormat::Json);
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LogConfig) -> FlowResult<()> {
    let env_filter = config.env_filter()?;

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_target(config.with_target)
        .with_span_events(config.span_events());

    let layer: FormatLayer = match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()
        .map_err(|e| FlowError::Internal(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(
        format = ?config.format,
        level = %config.level,
        "logging initialized"
    );

    Ok(())
}

/// 분석 대상 컨텍스트 필드가 포함된 span을 생성하는 매크로.
///
/// ```
/// let span = smartflow_core::flow_span!("trend", 10, "foreign");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! flow_span {
    ($name:expr, $days:expr) => {
        tracing::debug_span!($name, days = $days)
    };
    ($name:expr, $days:expr, $category:expr) => {
        tracing::debug_span!($name, days = $days, category = %$category)
    };
}
