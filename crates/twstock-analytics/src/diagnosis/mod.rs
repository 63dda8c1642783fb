//! 보조 진단 모듈.
//!
//! 종합 점수와 별개로 리포트에 표시되는 규칙 기반 진단을 제공합니다.
//!
//! - [`quote`]: 현재가, 전일 대비, 60일 고점 도전 진행률
//! - [`technical`]: MA5 이격도 진단, 종합 국면
//! - [`flow`]: 외국인 수급 진단
//! - [`position`]: 보유 단가 대비 손익 조언
//! - [`volume`]: 거래량 급증 감지
//! - [`valuation`]: 과거 PER 밴드 / PBR 가치 진단
//!
//! 모든 진단은 순수 함수이며, 필요한 지표가 없으면 `None`을 반환합니다.

pub mod flow;
pub mod position;
pub mod quote;
pub mod technical;
pub mod valuation;
pub mod volume;

pub use flow::{diagnose_flow, FlowDiagnosis, FlowVerdict};
pub use position::{diagnose_position, PositionAdvice, PositionDiagnosis};
pub use quote::QuoteOverview;
pub use technical::{diagnose_bias, diagnose_posture, BiasDiagnosis, BiasVerdict, Posture};
pub use valuation::{assess_valuation, PeBand, PeVerdict, PriceToBook, Valuation};
pub use volume::{detect_volume_surge, VolumeSurge, VolumeVerdict};
