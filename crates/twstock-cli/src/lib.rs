//! 대만 주식 분석 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 외부 데이터 수집 (Yahoo Finance 일봉, FinMind 3대 법인 매매와 뉴스, 로컬 파일)
//! - 분석 리포트 출력 (text, json)
//! - `twstock` 바이너리의 명령 구현

pub mod commands;
pub mod report;
pub mod sources;

pub use report::{render, ReportFormat};
pub use sources::{FlowSource, IngestError, IngestResult, NewsSource, PriceSource};
