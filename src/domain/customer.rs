// ==========================================
// 催收名单导入系统 - 客户记录领域模型
// ==========================================
// 职责: 表格原始行 (RawRow) 与标准化客户记录 (CustomerRecord)
// 生命周期: 仅在导入流程内,不在本子系统持久化
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// CellValue - 单元格原始值
// ==========================================
// 用途: 文件解析产物,弱类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    /// 文本单元格（TRIM 后为空视为 Empty）
    pub fn text(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 以文本形式读取（整数型数字不带小数点）
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// 数字转文本: 整数不带 `.0`（如 2021.0 → "2021"）
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 原始行: 表头（已标准化）→ 单元格值
pub type RawRow = HashMap<String, CellValue>;

// ==========================================
// FieldValue - 标准化字段值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
    List(Vec<String>),
    /// 无规则字段,原样透传
    Cell(CellValue),
}

// ==========================================
// CustomerRecord - 标准化客户记录
// ==========================================
// 红线: 金额字段均为有限非负数
// 红线: 已被规则消费的源列不得再以原名出现
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl CustomerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 读取金额/数值字段
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Cell(CellValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// 读取文本字段
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::Cell(CellValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 读取日期字段
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.fields.get(name)? {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// 读取列表字段（缺失返回空切片）
    pub fn list(&self, name: &str) -> &[String] {
        match self.fields.get(name) {
            Some(FieldValue::List(items)) => items.as_slice(),
            _ => &[],
        }
    }
}
