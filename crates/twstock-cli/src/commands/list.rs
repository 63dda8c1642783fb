//! 기본 관심 종목 목록 명령.

use std::fmt::Write;

use twstock_core::default_watchlist;

/// 관심 종목 목록을 표 형식 문자열로 만듭니다.
pub fn format_watchlist() -> String {
    let mut out = String::new();
    out.push_str("\n기본 관심 종목:\n");
    let _ = writeln!(out, "{:-<40}", "");
    for (symbol, name) in default_watchlist() {
        let _ = writeln!(out, "  {:<10} {}", symbol, name);
    }
    out.push_str("\n* 장외(上櫃) 종목은 .TWO 접미사를 사용하세요. (예: 6488.TWO)\n");
    out
}

/// 관심 종목 목록 출력
pub fn print_watchlist() {
    print!("{}", format_watchlist());
}
