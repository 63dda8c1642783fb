//! 종목 관련 뉴스 헤드라인.
//!
//! 같은 기사가 매체별 접미사(" - 매체명")만 달리해 여러 번 들어오므로
//! 접미사를 떼어낸 제목 기준으로 중복을 제거한 뒤 최신순으로 정리합니다.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 뉴스 한 건.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// 게시 시각 (대만 현지)
    pub date: NaiveDateTime,
    pub title: String,
    /// 원문 링크 (없으면 `None`)
    #[serde(default)]
    pub link: Option<String>,
    /// 매체명
    #[serde(default)]
    pub source: Option<String>,
}

impl NewsItem {
    /// 매체 접미사를 제거한 제목.
    pub fn clean_title(&self) -> &str {
        self.title.split(" - ").next().unwrap_or_default().trim()
    }
}

/// 뉴스 목록을 정리합니다.
///
/// 1. 제목을 첫 `" - "` 앞부분으로 정리
/// 2. 정리된 제목이 같으면 먼저 들어온 항목만 유지
/// 3. 게시 시각 내림차순 정렬 후 `limit`건으로 자름
pub fn curate_news(items: Vec<NewsItem>, limit: usize) -> Vec<NewsItem> {
    let mut seen = std::collections::HashSet::new();
    let mut curated: Vec<NewsItem> = items
        .into_iter()
        .filter_map(|mut item| {
            let title = item.clean_title().to_string();
            if title.is_empty() || !seen.insert(title.clone()) {
                return None;
            }
            item.title = title;
            item.link = item.link.filter(|l| !l.trim().is_empty());
            Some(item)
        })
        .collect();

    curated.sort_by(|a, b| b.date.cmp(&a.date));
    curated.truncate(limit);
    curated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(day: u32, hour: u32, title: &str, link: Option<&str>) -> NewsItem {
        NewsItem {
            date: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            title: title.to_string(),
            link: link.map(str::to_string),
            source: None,
        }
    }

    #[test]
    fn test_clean_title_strips_outlet_suffix() {
        let news = item(10, 9, " 台積電法說會 - 經濟日報 - udn ", None);
        assert_eq!(news.clean_title(), "台積電法說會");
    }

    #[test]
    fn test_curate_dedupes_sorts_and_limits() {
        let items = vec![
            item(8, 10, "台積電擴產 - 經濟日報", Some("https://a.example/1")),
            item(10, 9, "外資買超 - 工商時報", Some("")),
            item(9, 15, "台積電擴產 - 自由時報", Some("https://b.example/2")),
            item(10, 14, "ADR 上漲 - 鉅亨網", None),
        ];

        let curated = curate_news(items, 2);

        assert_eq!(curated.len(), 2);
        assert_eq!(curated[0].title, "ADR 上漲");
        assert_eq!(curated[1].title, "外資買超");
        assert_eq!(curated[1].link, None);

        let all = curate_news(
            vec![
                item(8, 10, "台積電擴產 - 經濟日報", Some("https://a.example/1")),
                item(9, 15, "台積電擴產 - 自由時報", Some("https://b.example/2")),
            ],
            8,
        );
        // 먼저 들어온 항목 유지
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].link.as_deref(), Some("https://a.example/1"));
    }
}
