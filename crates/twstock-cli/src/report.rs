//! 분석 리포트 출력 (text, json).

use std::fmt::{self, Write};
use std::str::FromStr;

use rust_decimal::Decimal;

use twstock_analytics::diagnosis::Valuation;
use twstock_analytics::AdvisorReport;
use twstock_core::{DecimalExt, Percentage};

/// 리포트 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// 사람이 읽는 텍스트
    #[default]
    Text,
    /// JSON (지표 테이블 제외)
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("지원하지 않는 출력 형식: {} (text, json)", s)),
        }
    }
}

/// 리포트를 지정한 형식의 문자열로 변환합니다.
pub fn render(report: &AdvisorReport, format: ReportFormat) -> anyhow::Result<String> {
    match format {
        ReportFormat::Json => {
            let report = report.clone().without_frame();
            Ok(serde_json::to_string_pretty(&report)?)
        }
        ReportFormat::Text => {
            let mut out = String::new();
            write_text(&mut out, report)?;
            Ok(out)
        }
    }
}

fn num(value: Decimal) -> String {
    value.round_dp_half_up(2).normalize().to_string()
}

fn pct(value: Percentage) -> String {
    value.round_dp_half_up(2).to_percentage_string()
}

fn opt_pct(value: Option<Percentage>) -> String {
    value.map(pct).unwrap_or_else(|| "N/A".to_string())
}

fn opt_num(value: Option<Decimal>) -> String {
    value.map(num).unwrap_or_else(|| "N/A".to_string())
}

fn opt_label<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "데이터 부족".to_string())
}

fn write_text(out: &mut String, report: &AdvisorReport) -> fmt::Result {
    let quote = &report.quote;
    let signals = &report.signals;
    let score = &report.score;

    writeln!(out, "{} ({}) 기준일 {}", report.ticker, report.period, report.as_of)?;
    writeln!(out, "{:=<50}", "")?;

    writeln!(out, "\n[시세]")?;
    writeln!(
        out,
        "  현재가 {}  전일 대비 {} ({})  거래량 {}장",
        num(quote.price),
        num(quote.change),
        opt_pct(quote.change_pct),
        num(quote.volume_lots)
    )?;
    writeln!(
        out,
        "  60일 고점 {}  거리 {}  도전 진행률 {}",
        num(quote.high_60),
        pct(quote.distance_to_high_pct),
        pct(quote.challenge_progress_pct)
    )?;
    writeln!(
        out,
        "  MA5 {}  MA20 {}  MA60 {}  RSI {}",
        opt_num(quote.ma_short),
        opt_num(quote.ma_mid),
        opt_num(quote.ma_long),
        opt_num(signals.rsi)
    )?;

    writeln!(out, "\n[시그널]")?;
    writeln!(out, "  추세: {}", opt_label(signals.trend))?;
    writeln!(out, "  MACD: {}", opt_label(signals.macd_cross))?;
    writeln!(out, "  모멘텀: {}", opt_label(signals.acceleration))?;
    writeln!(
        out,
        "  RSI: {} / {}",
        opt_label(signals.rsi_zone),
        opt_label(signals.rsi_badge)
    )?;
    writeln!(out, "  돌파 리스크: {}", opt_label(signals.breakout))?;
    writeln!(out, "  ATR 스탑: {}", opt_label(signals.stop))?;

    writeln!(out, "\n[종합 점수]")?;
    writeln!(out, "  {}점 → {}", score.score, score.tier.label())?;
    writeln!(out, "  {}", score.rationale)?;
    for item in &score.contributions {
        writeln!(
            out,
            "    {:<14} {:+}  {}",
            item.component.as_str(),
            item.points,
            item.reason
        )?;
    }
    if !score.skipped.is_empty() {
        let skipped: Vec<&str> = score.skipped.iter().map(|c| c.as_str()).collect();
        writeln!(out, "  제외된 항목: {}", skipped.join(", "))?;
    }

    writeln!(out, "\n[3대 법인]")?;
    match &report.institutional {
        Some(flow) => writeln!(
            out,
            "  {} 외국인 {}장  투신 {}장  자영업자 {}장",
            flow.date,
            num(flow.foreign),
            num(flow.trust),
            num(flow.dealer)
        )?,
        None => writeln!(out, "  데이터 없음")?,
    }

    let diag = &report.diagnostics;
    writeln!(out, "\n[진단]")?;
    if let Some(posture) = diag.posture {
        writeln!(out, "  국면: {}", posture.label())?;
    }
    if let Some(bias) = &diag.bias {
        writeln!(out, "  MA5 이격도 {}: {}", pct(bias.bias_pct), bias.verdict.label())?;
    }
    if let Some(flow) = &diag.flow {
        writeln!(out, "  수급: {}", flow.verdict.label())?;
    }
    if let Some(volume) = &diag.volume {
        writeln!(out, "  거래량 {}배: {}", num(volume.ratio), volume.verdict.label())?;
    }
    if let Some(position) = &diag.position {
        writeln!(
            out,
            "  보유 단가 {} 손익 {}: {}",
            num(position.cost),
            pct(position.pl_pct),
            position.advice.label()
        )?;
    }
    match &diag.valuation {
        Some(Valuation::PeBand(band)) => {
            writeln!(
                out,
                "  PER {} (1년 평균 {}, {}~{}): {}",
                num(band.current_pe),
                num(band.avg_pe),
                num(band.min_pe),
                num(band.max_pe),
                band.verdict.label()
            )?;
            writeln!(
                out,
                "    저평가 {}  적정 {}  고평가 {}",
                num(band.cheap_price),
                num(band.fair_price),
                num(band.expensive_price)
            )?;
        }
        Some(Valuation::PriceToBook(pb)) => {
            let note = if pb.below_book { "순자산 이하" } else { "순자산 이상" };
            writeln!(out, "  PBR {}: {}", num(pb.pb), note)?;
        }
        None => {}
    }

    if !report.news.is_empty() {
        writeln!(out, "\n[뉴스]")?;
        for item in &report.news {
            writeln!(out, "  {} | {}", item.date.format("%Y-%m-%d %H:%M"), item.title)?;
            if let Some(link) = &item.link {
                writeln!(out, "    {}", link)?;
            }
        }
    }

    Ok(())
}
