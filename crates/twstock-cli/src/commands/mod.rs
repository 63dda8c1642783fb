//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod download;
pub mod list;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use twstock_core::{LookbackPeriod, Ticker};

/// 시세 수집 실패 시 사용자에게 보이는 유일한 에러.
///
/// 세부 원인은 로그(`warn!`)로만 남깁니다.
#[derive(Debug, Error)]
#[error("{ticker} ({period}) 데이터를 사용할 수 없습니다")]
pub struct DataUnavailable {
    pub ticker: Ticker,
    pub period: LookbackPeriod,
}

/// 네트워크 요청 진행 표시
pub(crate) fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
