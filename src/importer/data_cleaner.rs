// ==========================================
// 催收名单导入系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 金额转换 / 日期规范化 / 列表拆分
// 红线: 清洗失败一律降级（None / 空列表）,不产生错误
// ==========================================

use crate::domain::customer::CellValue;
use crate::importer::customer_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Excel 序列日期的起点（1900 日期系统,含闰年 bug 修正）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Excel 可表示的最大序列日期（9999-12-31）
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d-%b-%Y", "%b %d, %Y", "%B %d, %Y", "%Y%m%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_money(&self, cell: &CellValue) -> Option<f64> {
        let value = match cell {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => self.parse_money_text(s)?,
            CellValue::Empty | CellValue::DateTime(_) => return None,
        };

        // 金额必须为有限非负数
        if value.is_finite() && value >= 0.0 {
            Some(value)
        } else {
            None
        }
    }

    fn parse_date(&self, cell: &CellValue) -> Option<NaiveDate> {
        match cell {
            CellValue::Empty => None,
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Number(serial) => self.excel_serial_to_date(*serial),
            CellValue::Text(s) => self.parse_date_text(s),
        }
    }

    fn split_list(&self, cell: &CellValue) -> Vec<String> {
        match cell.as_text() {
            Some(text) => text
                .split(',')
                .filter_map(|part| self.normalize_null(Some(part.to_string())))
                .collect(),
            None => Vec::new(),
        }
    }

    fn clean_identifier(&self, cell: &CellValue, strip_leading_hyphen: bool) -> Option<String> {
        let text = self.normalize_null(cell.as_text())?;
        if strip_leading_hyphen {
            let stripped = text.strip_prefix('-').unwrap_or(&text);
            self.normalize_null(Some(stripped.to_string()))
        } else {
            Some(text)
        }
    }
}

impl DataCleaner {
    /// 去掉千分位与币种标记后解析金额
    fn parse_money_text(&self, raw: &str) -> Option<f64> {
        let trimmed = raw.trim();
        let without_currency = trimmed
            .strip_prefix('₱')
            .or_else(|| trimmed.strip_prefix("PHP"))
            .or_else(|| trimmed.strip_prefix("Php"))
            .or_else(|| trimmed.strip_prefix("php"))
            .unwrap_or(trimmed);

        let digits: String = without_currency
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse::<f64>().ok()
    }

    /// Excel 序列日期 → 日历日期
    fn excel_serial_to_date(&self, serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
            return None;
        }
        let (y, m, d) = EXCEL_EPOCH;
        let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
        epoch.checked_add_signed(Duration::days(serial.floor() as i64))
    }

    /// 文本日期解析（多格式兼容）
    fn parse_date_text(&self, raw: &str) -> Option<NaiveDate> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
                return Some(date);
            }
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(dt.date());
            }
        }
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  hello  "), "hello");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ".to_string())), None);
        assert_eq!(cleaner.normalize_null(Some("".to_string())), None);
        assert_eq!(
            cleaner.normalize_null(Some("  value  ".to_string())),
            Some("value".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_parse_money() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_money(&CellValue::Number(1500.25)), Some(1500.25));
        assert_eq!(cleaner.parse_money(&text("1,234.50")), Some(1234.5));
        assert_eq!(cleaner.parse_money(&text("₱ 2,000")), Some(2000.0));
        assert_eq!(cleaner.parse_money(&text("PHP 99.9")), Some(99.9));
        assert_eq!(cleaner.parse_money(&text("abc")), None);
        assert_eq!(cleaner.parse_money(&text("NaN")), None);
        assert_eq!(cleaner.parse_money(&text("inf")), None);
        assert_eq!(cleaner.parse_money(&CellValue::Number(-5.0)), None);
        assert_eq!(cleaner.parse_money(&CellValue::Empty), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let cleaner = DataCleaner;
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);

        assert_eq!(cleaner.parse_date(&text("2024-03-15")), expected);
        assert_eq!(cleaner.parse_date(&text("2024/03/15")), expected);
        assert_eq!(cleaner.parse_date(&text("03/15/2024")), expected);
        assert_eq!(cleaner.parse_date(&text("15-Mar-2024")), expected);
        assert_eq!(cleaner.parse_date(&text("March 15, 2024")), expected);
        assert_eq!(cleaner.parse_date(&text("2024-03-15 08:30:00")), expected);
        assert_eq!(cleaner.parse_date(&text("2024-03-15T08:30:00+08:00")), expected);
        // Excel 序列日期 45366 = 2024-03-15
        assert_eq!(cleaner.parse_date(&CellValue::Number(45366.0)), expected);
    }

    #[test]
    fn test_parse_date_invalid_is_omitted() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_date(&text("not a date")), None);
        assert_eq!(cleaner.parse_date(&text("2024-02-30")), None);
        assert_eq!(cleaner.parse_date(&CellValue::Number(-3.0)), None);
        assert_eq!(cleaner.parse_date(&CellValue::Empty), None);
    }

    #[test]
    fn test_split_list() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.split_list(&text("a@x.com, b@y.com,,")),
            vec!["a@x.com".to_string(), "b@y.com".to_string()]
        );
        assert!(cleaner.split_list(&CellValue::Empty).is_empty());
    }

    #[test]
    fn test_clean_identifier() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.clean_identifier(&text(" -C-001 "), true),
            Some("C-001".to_string())
        );
        assert_eq!(
            cleaner.clean_identifier(&text("-C001"), false),
            Some("-C001".to_string())
        );
        assert_eq!(
            cleaner.clean_identifier(&CellValue::Number(2019.0), false),
            Some("2019".to_string())
        );
        assert_eq!(cleaner.clean_identifier(&text("-"), true), None);
    }
}
