//! 조회 기간 정의.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 시세 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LookbackPeriod {
    /// 5일
    #[serde(rename = "5d")]
    Days5,
    /// 1개월
    #[serde(rename = "1mo")]
    Month1,
    /// 6개월
    #[default]
    #[serde(rename = "6mo")]
    Month6,
    /// 1년
    #[serde(rename = "1y")]
    Year1,
    /// 2년
    #[serde(rename = "2y")]
    Year2,
}

impl LookbackPeriod {
    /// 지원되는 모든 기간.
    pub const ALL: [LookbackPeriod; 5] = [
        Self::Days5,
        Self::Month1,
        Self::Month6,
        Self::Year1,
        Self::Year2,
    ];

    /// Yahoo Finance `range` 파라미터 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days5 => "5d",
            Self::Month1 => "1mo",
            Self::Month6 => "6mo",
            Self::Year1 => "1y",
            Self::Year2 => "2y",
        }
    }

    /// 달력 기준 대략적인 일수.
    pub fn calendar_days(&self) -> i64 {
        match self {
            Self::Days5 => 7,
            Self::Month1 => 31,
            Self::Month6 => 183,
            Self::Year1 => 365,
            Self::Year2 => 730,
        }
    }

    /// 기준일로부터 기간 시작일을 계산합니다.
    pub fn start_from(&self, end: NaiveDate) -> NaiveDate {
        end - Duration::days(self.calendar_days())
    }
}

impl FromStr for LookbackPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "5d" => Ok(Self::Days5),
            "1mo" => Ok(Self::Month1),
            "6mo" => Ok(Self::Month6),
            "1y" => Ok(Self::Year1),
            "2y" => Ok(Self::Year2),
            _ => Err(CoreError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
