//! # TwStock Core
//!
//! 대만 주식 분석 도구의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 일봉 시세 구조체 (`PriceBar`, `PriceSeries`)
//! - 3대 법인 매매 동향 (`InstitutionalFlow`)
//! - 종목 뉴스 정리 (`NewsItem`)
//! - 종목 코드 및 조회 기간
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
