// ==========================================
// 催收名单导入系统 - 文件解析器实现
// ==========================================
// 阶段 0: 内存字节 → 原始行 (RawRow)
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv)
// ==========================================

use crate::domain::customer::{CellValue, RawRow};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::customer_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 表头标准化: TRIM + 内部连续空白折叠为单个下划线
pub fn normalize_header(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

/// 重复表头（不区分大小写）依次改名为 `<header>_2`、`<header>_3`…
///
/// 重复的联系方式列由此落到 `contact_no_2` / `email_2` 等规则源列上。
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = headers
        .iter()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_ascii_lowercase())
        .collect();
    let mut claimed: HashSet<String> = HashSet::new();

    headers
        .into_iter()
        .map(|header| {
            if header.is_empty() || claimed.insert(header.to_ascii_lowercase()) {
                return header;
            }
            let mut suffix = 2;
            loop {
                let candidate = format!("{}_{}", header, suffix);
                let key = candidate.to_ascii_lowercase();
                if !seen.contains(&key) {
                    seen.insert(key.clone());
                    claimed.insert(key);
                    debug!(header = %header, renamed = %candidate, "重复表头已改名");
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

/// 按表头组装一行,跳过空表头列；整行为空返回 None
fn build_row(headers: &[String], cells: impl Iterator<Item = CellValue>) -> Option<RawRow> {
    let mut row_map = RawRow::new();
    for (header, value) in headers.iter().zip(cells) {
        if header.is_empty() {
            continue;
        }
        row_map.insert(header.clone(), value);
    }

    // 跳过完全空白的行
    if row_map.values().all(CellValue::is_empty) {
        return None;
    }
    Some(row_map)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头
        let headers = dedupe_headers(reader.headers()?.iter().map(normalize_header).collect());

        // 读取所有行
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(row) = build_row(&headers, record.iter().map(CellValue::text)) {
                rows.push(row);
            }
        }

        debug!(rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(naive) => CellValue::DateTime(naive),
                None => CellValue::Number(dt.as_f64()),
            },
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        // 格式自动识别（xlsx/xls/xlsb/ods）
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        // 只读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names.first().cloned().ok_or(ImportError::EmptyWorkbook)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）；空表返回空结果
        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => dedupe_headers(
                header_row
                    .iter()
                    .map(|cell| normalize_header(&cell.to_string()))
                    .collect(),
            ),
            None => return Ok(Vec::new()),
        };

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            if let Some(row) = build_row(&headers, data_row.iter().map(Self::convert_cell)) {
                records.push(row);
            }
        }

        debug!(sheet = %sheet_name, rows = records.len(), "Excel 解析完成");
        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 根据文件名扩展名选择解析器
    pub fn parser_for(file_name: &str) -> ImportResult<Box<dyn FileParser>> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser)),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Box::new(ExcelParser)),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }

    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        Self::parser_for(file_name)?.parse_to_raw_rows(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sample_xlsx() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "  Case   ID ").unwrap();
        sheet.write_string(0, 1, "principal").unwrap();
        sheet.write_string(1, 0, "-C001").unwrap();
        sheet.write_number(1, 1, 1500.5).unwrap();
        // 无表头的列
        sheet.write_string(1, 2, "ignored").unwrap();
        // 第 2 行留空
        sheet.write_string(3, 0, "C002").unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Case   ID "), "Case_ID");
        assert_eq!(normalize_header("total_os"), "total_os");
        assert_eq!(normalize_header("Bill\tDue  Date"), "Bill_Due_Date");
        assert_eq!(normalize_header("   "), "");
    }

    #[test]
    fn test_excel_parser_reads_first_sheet() {
        let rows = ExcelParser.parse_to_raw_rows(&sample_xlsx()).unwrap();

        // 空行被跳过
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Case_ID"),
            Some(&CellValue::Text("-C001".to_string()))
        );
        assert_eq!(rows[0].get("principal"), Some(&CellValue::Number(1500.5)));
        // 空表头列被忽略
        assert_eq!(rows[0].len(), 2);
        assert_eq!(
            rows[1].get("Case_ID"),
            Some(&CellValue::Text("C002".to_string()))
        );
    }

    #[test]
    fn test_excel_parser_rejects_garbage() {
        let result = ExcelParser.parse_to_raw_rows(b"definitely not a workbook");
        let err = result.unwrap_err();
        assert!(err.is_parse_error(), "unexpected error: {err}");
    }

    #[test]
    fn test_csv_parser_valid_bytes() {
        let data = "case_id, contact  no ,principal\nC001,0917 123 4567,100\n,,\nC002,,abc\n";
        let rows = CsvParser.parse_to_raw_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("contact_no"),
            Some(&CellValue::Text("0917 123 4567".to_string()))
        );
        assert_eq!(rows[1].get("contact_no"), Some(&CellValue::Empty));
    }

    #[test]
    fn test_dedupe_headers() {
        let headers = vec![
            "contact_no".to_string(),
            "Contact_No".to_string(),
            "contact_no_2".to_string(),
            "".to_string(),
            "".to_string(),
            "email".to_string(),
        ];
        assert_eq!(
            dedupe_headers(headers),
            vec!["contact_no", "Contact_No_3", "contact_no_2", "", "", "email"]
        );
    }

    #[test]
    fn test_csv_duplicate_headers_keep_every_value() {
        use crate::importer::customer_importer_trait::FieldNormalizer as _;
        use crate::importer::field_normalizer::FieldNormalizer;

        let data = "contact_no,Contact No,principal,principal \n0917 123 4567,639181234567,1500,\n";
        let rows = CsvParser.parse_to_raw_rows(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("principal"),
            Some(&CellValue::Text("1500".to_string()))
        );
        assert_eq!(rows[0].get("principal_2"), Some(&CellValue::Empty));
        assert_eq!(
            rows[0].get("Contact_No_2"),
            Some(&CellValue::Text("639181234567".to_string()))
        );

        // 重复的联系方式列并入号码列表,金额不被空列覆盖
        let record = FieldNormalizer::default().normalize(&rows[0]);
        assert_eq!(record.number("principal"), Some(1500.0));
        assert_eq!(
            record.list("contact_no"),
            &["09171234567".to_string(), "09181234567".to_string()]
        );
    }

    #[test]
    fn test_universal_parser_dispatch() {
        assert!(UniversalFileParser::parser_for("callfile.XLSX").is_ok());
        assert!(UniversalFileParser::parser_for("callfile.csv").is_ok());
        assert!(matches!(
            UniversalFileParser::parser_for("callfile.pdf"),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
