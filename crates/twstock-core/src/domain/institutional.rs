//! 3대 법인(외국인, 투신, 자영업자) 매매 동향.
//!
//! 데이터 제공자는 투자자 명칭별로 매수/매도 주식 수를 보고합니다.
//! 이 모듈은 가장 최근 거래일의 행만 골라 분류별 순매수(장 단위)로 합산합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::InvestorClassConfig;
use crate::types::DecimalExt;

/// 투자자 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestorClass {
    /// 외국인 (外資)
    Foreign,
    /// 투신 (投信)
    Trust,
    /// 자영업자 (自營商)
    Dealer,
}

impl fmt::Display for InvestorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvestorClass::Foreign => write!(f, "foreign"),
            InvestorClass::Trust => write!(f, "trust"),
            InvestorClass::Dealer => write!(f, "dealer"),
        }
    }
}

impl InvestorClassConfig {
    /// 제공자 명칭을 투자자 분류로 매핑합니다.
    pub fn classify(&self, name: &str) -> Option<InvestorClass> {
        let matches = |names: &[String]| names.iter().any(|n| n == name);
        if matches(&self.foreign) {
            Some(InvestorClass::Foreign)
        } else if matches(&self.trust) {
            Some(InvestorClass::Trust)
        } else if matches(&self.dealer) {
            Some(InvestorClass::Dealer)
        } else {
            None
        }
    }
}

/// 데이터 제공자가 반환하는 투자자별 매매 행 (주 단위).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionalRow {
    /// 거래일
    pub date: NaiveDate,
    /// 투자자 명칭 (예: "Foreign_Investor")
    pub name: String,
    /// 매수 주식 수
    pub buy: Decimal,
    /// 매도 주식 수
    pub sell: Decimal,
}

/// 최근 거래일의 3대 법인 순매수 (장 단위).
///
/// 값이 0인 것과 데이터가 없는 것은 다릅니다. 데이터가 없으면
/// `Option<InstitutionalFlow>`의 `None`으로 표현합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionalFlow {
    /// 데이터 기준일
    pub date: NaiveDate,
    /// 외국인 순매수
    pub foreign: Decimal,
    /// 투신 순매수
    pub trust: Decimal,
    /// 자영업자 순매수
    pub dealer: Decimal,
}

impl InstitutionalFlow {
    /// 새 법인 동향을 생성합니다.
    pub fn new(date: NaiveDate, foreign: Decimal, trust: Decimal, dealer: Decimal) -> Self {
        Self {
            date,
            foreign,
            trust,
            dealer,
        }
    }

    /// 분류별 순매수.
    pub fn net(&self, class: InvestorClass) -> Decimal {
        match class {
            InvestorClass::Foreign => self.foreign,
            InvestorClass::Trust => self.trust,
            InvestorClass::Dealer => self.dealer,
        }
    }

    /// 외국인 + 투신 합산 순매수.
    pub fn foreign_and_trust(&self) -> Decimal {
        self.foreign + self.trust
    }

    /// 제공자 행을 최근 거래일 기준으로 합산합니다.
    ///
    /// 행이 없으면 `None`을 반환합니다. 매핑되지 않은 명칭은 무시합니다.
    pub fn aggregate(rows: &[InstitutionalRow], classes: &InvestorClassConfig) -> Option<Self> {
        let last_day = rows.iter().map(|r| r.date).max()?;

        let mut flow = Self::new(last_day, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        for row in rows.iter().filter(|r| r.date == last_day) {
            let net = row.buy - row.sell;
            match classes.classify(&row.name) {
                Some(InvestorClass::Foreign) => flow.foreign += net,
                Some(InvestorClass::Trust) => flow.trust += net,
                Some(InvestorClass::Dealer) => flow.dealer += net,
                None => {
                    tracing::trace!(name = %row.name, "Unmapped investor class ignored");
                }
            }
        }

        flow.foreign = flow.foreign.shares_to_lots();
        flow.trust = flow.trust.shares_to_lots();
        flow.dealer = flow.dealer.shares_to_lots();

        Some(flow)
    }
}
