// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、内存中生成测试用名单表格
// ==========================================

#![allow(dead_code)]

use callfile_import::db::{init_schema, open_sqlite_connection};
use rusqlite::{params, Connection};
use rust_xlsxwriter::Workbook;
use std::error::Error;
use tempfile::NamedTempFile;

/// 名单表头（含别名列与多号码列）
pub const CALLFILE_HEADERS: &[&str] = &[
    "Case ID",
    "Full Name",
    "principal",
    "total_os",
    "mo_amort",
    "bill_due_date",
    "contact_no",
    "emergency_contact_mobile_number",
    "email",
];

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入导入参数配置
pub fn insert_test_config(
    conn: &Connection,
    chunk_size: usize,
    max_concurrent_chunks: usize,
) -> Result<(), Box<dyn Error>> {
    for (key, value) in [
        ("import.chunk_size", chunk_size),
        ("import.max_concurrent_chunks", max_concurrent_chunks),
    ] {
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value.to_string()],
        )?;
    }
    Ok(())
}

/// 生成 n 行名单数据的 xlsx（内存）
pub fn build_callfile_xlsx(rows: usize) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in CALLFILE_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for i in 0..rows {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, format!("-CASE{:05}", i))?;
        sheet.write_string(row, 1, format!("Customer {}", i))?;
        if i % 10 == 0 {
            // principal 不可解析 → 回退 total_os
            sheet.write_string(row, 2, "n/a")?;
        } else {
            sheet.write_number(row, 2, 1000.0 + i as f64)?;
        }
        sheet.write_string(row, 3, "12,500.75")?;
        sheet.write_number(row, 4, 850.0)?;
        sheet.write_string(row, 5, "03/15/2024")?;
        sheet.write_string(row, 6, "0917 123 4567, 639181234567")?;
        sheet.write_string(row, 7, "+63 918 000 1111")?;
        sheet.write_string(row, 8, format!("c{}@example.com", i))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// 生成 n 行名单数据的 CSV
pub fn build_callfile_csv(rows: usize) -> Vec<u8> {
    let mut out = CALLFILE_HEADERS.join(",");
    out.push('\n');
    for i in 0..rows {
        out.push_str(&format!(
            "-CASE{:05},Customer {},{},\"12,500.75\",850,2024-03-15,\"0917 123 4567\",,c{}@example.com\n",
            i,
            i,
            1000 + i,
            i
        ));
    }
    out.into_bytes()
}

/// 统计数据库中某名单的客户数
pub fn count_customers(db_path: &str, callfile: &str) -> Result<i64, Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    let count = conn.query_row(
        "SELECT COUNT(*) FROM customer c JOIN callfile f ON f.callfile_id = c.callfile_id
         WHERE f.name = ?1",
        params![callfile],
        |row| row.get(0),
    )?;
    Ok(count)
}
