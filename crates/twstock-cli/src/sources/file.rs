//! 로컬 파일 입출력.
//!
//! - CSV 시세: `date,open,high,low,close,volume` (헤더 필수, 날짜 YYYY-MM-DD)
//! - JSON 법인 매매: `[{"date","name","buy","sell"}]` 배열 또는 FinMind 응답 원문(`data` 필드)

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use twstock_core::{InstitutionalRow, LookbackPeriod, PriceBar, PriceSeries, Ticker};

use super::{IngestError, IngestResult};

const CSV_HEADER: &str = "date,open,high,low,close,volume";

/// CSV 파일에서 일봉 시계열을 읽습니다.
///
/// 빈 줄은 무시하며, 날짜 순서가 섞여 있으면 정렬 후 같은 날짜는 마지막 행을 사용합니다.
pub fn load_csv(path: &Path, ticker: Ticker, period: LookbackPeriod) -> IngestResult<PriceSeries> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| IngestError::Empty(format!("{}: 빈 파일", path.display())))?;
    if header.trim().to_lowercase() != CSV_HEADER {
        return Err(IngestError::Parse(format!(
            "{}: 헤더가 '{}'가 아닙니다",
            path.display(),
            CSV_HEADER
        )));
    }

    let mut bars = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // 헤더가 1행이므로 데이터는 2행부터
        bars.push(parse_row(&line).map_err(|msg| {
            IngestError::Parse(format!("{}:{}: {}", path.display(), idx + 2, msg))
        })?);
    }

    let series = PriceSeries::from_unsorted(ticker, period, bars)?;
    info!(path = %path.display(), bars = series.len(), "Loaded daily bars from CSV");
    Ok(series)
}

fn parse_row(line: &str) -> Result<PriceBar, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != 6 {
        return Err(format!("열 개수가 6이 아닙니다 ({}개)", fields.len()));
    }

    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .map_err(|e| format!("날짜 '{}' 파싱 실패: {}", fields[0], e))?;
    let num = |s: &str| Decimal::from_str(s).map_err(|e| format!("숫자 '{}' 파싱 실패: {}", s, e));

    Ok(PriceBar::new(
        date,
        num(fields[1])?,
        num(fields[2])?,
        num(fields[3])?,
        num(fields[4])?,
        num(fields[5])?,
    ))
}

/// 시계열을 CSV 파일로 저장합니다.
pub fn write_csv(path: &Path, series: &PriceSeries) -> IngestResult<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{}", CSV_HEADER)?;
    for bar in series.bars() {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        )?;
    }
    writer.flush()?;

    info!(path = %path.display(), bars = series.len(), "Saved daily bars to CSV");
    Ok(series.len())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlowFile {
    Rows(Vec<InstitutionalRow>),
    Envelope { data: Vec<InstitutionalRow> },
}

/// JSON 파일에서 법인 매매 행을 읽습니다.
pub fn load_flow_rows(path: &Path) -> IngestResult<Vec<InstitutionalRow>> {
    let reader = BufReader::new(File::open(path)?);
    let file: FlowFile = serde_json::from_reader(reader)?;
    let rows = match file {
        FlowFile::Rows(rows) | FlowFile::Envelope { data: rows } => rows,
    };
    info!(path = %path.display(), rows = rows.len(), "Loaded institutional rows from JSON");
    Ok(rows)
}
