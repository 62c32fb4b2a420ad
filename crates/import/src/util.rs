use chrono::{Datelike, NaiveDate};

/// Tried after a profile's own formats. Day-first comes before month-first
/// since every supported bank is UK-based.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%y", "%d %b %Y", "%d %B %Y", "%Y/%m/%d",
];

pub fn parse_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let try_all = |candidate: &str| {
        formats
            .iter()
            .map(String::as_str)
            .chain(FALLBACK_DATE_FORMATS.iter().copied())
            .filter_map(|fmt| {
                let date = NaiveDate::parse_from_str(candidate, fmt).ok()?;
                // chrono's %Y happily reads "24" as year 24; leave that to %y.
                (!fmt.contains("%Y") || date.year() >= 1000).then_some(date)
            })
            .next()
    };
    try_all(s).or_else(|| {
        // Timestamps such as "2024-01-03 10:15:00" or "2024-01-03T10:15:00Z".
        let head = s.split(|c: char| c.is_whitespace() || c == 'T').next()?;
        (head != s).then(|| try_all(head)).flatten()
    })
}

/// Lowercased, trimmed header with any UTF-8 BOM removed.
pub fn normalize_header(h: &str) -> String {
    h.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Index of the column best matching `synonyms`: an exact name first, then
/// the first column containing a synonym. Columns in `taken` are skipped.
pub fn find_column(headers: &[String], synonyms: &[String], taken: &[usize]) -> Option<usize> {
    let free = |i: &usize| !taken.contains(i);
    let synonyms: Vec<String> = synonyms.iter().map(|s| s.to_lowercase()).collect();
    synonyms
        .iter()
        .find_map(|syn| (0..headers.len()).filter(free).find(|&i| headers[i] == *syn))
        .or_else(|| {
            synonyms.iter().find_map(|syn| {
                (0..headers.len())
                    .filter(free)
                    .find(|&i| headers[i].contains(syn.as_str()))
            })
        })
}

/// Every column exactly named by a synonym, or failing that every column
/// containing one.
pub fn find_columns(headers: &[String], synonyms: &[String], taken: &[usize]) -> Vec<usize> {
    let synonyms: Vec<String> = synonyms.iter().map(|s| s.to_lowercase()).collect();
    let pick = |exact: bool| -> Vec<usize> {
        (0..headers.len())
            .filter(|i| !taken.contains(i))
            .filter(|&i| {
                synonyms.iter().any(|syn| {
                    if exact {
                        headers[i] == *syn
                    } else {
                        headers[i].contains(syn.as_str())
                    }
                })
            })
            .collect()
    };
    let exact = pick(true);
    if exact.is_empty() {
        pick(false)
    } else {
        exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| normalize_header(h)).collect()
    }

    fn syn(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_date_prefers_profile_formats() {
        let d = parse_date("03/01/2024", &syn(&["%m/%d/%Y"])).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn parse_date_falls_back_to_day_first() {
        let d = parse_date("03/01/2024", &[]).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn parse_date_strips_time_of_day() {
        let d = parse_date("2024-01-03 10:15:00", &[]).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        let d = parse_date("2024-01-03T10:15:00Z", &[]).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn two_digit_year_is_not_read_as_four_digit() {
        let formats = syn(&["%d/%m/%Y", "%d/%m/%y"]);
        let d = parse_date("03/01/24", &formats).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        let d = parse_date("03/01/24", &[]).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        let d = parse_date("03/01/2024", &formats).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn parse_date_rejects_impossible_dates() {
        assert_eq!(parse_date("31/02/2024", &[]), None);
        assert_eq!(parse_date("", &[]), None);
        assert_eq!(parse_date("yesterday", &[]), None);
    }

    #[test]
    fn normalize_header_strips_bom() {
        assert_eq!(normalize_header("\u{feff}Date "), "date");
    }

    #[test]
    fn exact_match_beats_substring() {
        let h = headers(&["Local amount", "Amount"]);
        assert_eq!(find_column(&h, &syn(&["amount"]), &[]), Some(1));
    }

    #[test]
    fn substring_match_when_no_exact() {
        let h = headers(&["Transaction Date", "Details"]);
        assert_eq!(find_column(&h, &syn(&["date"]), &[]), Some(0));
    }

    #[test]
    fn taken_columns_are_skipped() {
        let h = headers(&["Debit Amount", "Credit Amount"]);
        assert_eq!(find_column(&h, &syn(&["amount"]), &[0, 1]), None);
    }

    #[test]
    fn find_columns_collects_all_exact() {
        let h = headers(&["Type", "Name", "Category", "Category split"]);
        assert_eq!(find_columns(&h, &syn(&["category", "type"]), &[]), vec![0, 2]);
    }
}
