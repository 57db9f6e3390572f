// ==========================================
// 催收名单导入系统 - 字段标准化器实现
// ==========================================
// 阶段 1: RawRow → CustomerRecord
// 职责: 解释 FIELD_RULES,未被规则消费的列原样透传
// 红线: 纯函数,对任意输入行都返回一条记录,从不失败
// ==========================================

use crate::domain::customer::{CellValue, CustomerRecord, FieldValue, RawRow};
use crate::importer::customer_importer_trait::{
    DataCleaner, FieldNormalizer as FieldNormalizerTrait,
};
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::field_rules::{consumed_columns, rule_for, FieldKind, FieldRule, FIELD_RULES};
use crate::importer::phone::phones_from_cell;
use std::collections::{BTreeMap, HashSet};

pub struct FieldNormalizer {
    data_cleaner: Box<dyn DataCleaner>,
    consumed: HashSet<String>,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(Box::new(DataCleanerImpl))
    }
}

/// 行内列名索引（小写 → 单元格）；同名列取字典序第一个非空值
struct ColumnIndex<'a> {
    cells: BTreeMap<String, &'a CellValue>,
}

impl<'a> ColumnIndex<'a> {
    fn new(row: &'a RawRow) -> Self {
        let mut keys: Vec<&String> = row.keys().collect();
        keys.sort();

        let mut cells: BTreeMap<String, &'a CellValue> = BTreeMap::new();
        for key in keys {
            let value = &row[key];
            let slot = cells.entry(key.to_ascii_lowercase()).or_insert(value);
            if slot.is_empty() {
                *slot = value;
            }
        }
        Self { cells }
    }

    fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.cells
            .get(&column.to_ascii_lowercase())
            .copied()
            .filter(|cell| !cell.is_empty())
    }

    fn cells_for(&self, rule: &FieldRule) -> Vec<&'a CellValue> {
        rule.source_columns()
            .into_iter()
            .filter_map(|column| self.get(column))
            .collect()
    }
}

impl FieldNormalizer {
    pub fn new(data_cleaner: Box<dyn DataCleaner>) -> Self {
        Self {
            data_cleaner,
            consumed: consumed_columns(),
        }
    }

    /// 金额: 自身源列 → fallback 字段源列 → 0
    fn money(&self, index: &ColumnIndex<'_>, rule: &FieldRule, fallback: Option<&str>) -> f64 {
        let own = index
            .cells_for(rule)
            .into_iter()
            .find_map(|cell| self.data_cleaner.parse_money(cell));
        if let Some(value) = own {
            return value;
        }

        fallback
            .and_then(rule_for)
            .and_then(|target| {
                index
                    .cells_for(target)
                    .into_iter()
                    .find_map(|cell| self.data_cleaner.parse_money(cell))
            })
            .unwrap_or(0.0)
    }

    fn phone_list(&self, index: &ColumnIndex<'_>, rule: &FieldRule) -> Vec<String> {
        index
            .cells_for(rule)
            .into_iter()
            .filter_map(CellValue::as_text)
            .flat_map(|text| phones_from_cell(&text))
            .collect()
    }

    fn text_list(&self, index: &ColumnIndex<'_>, rule: &FieldRule) -> Vec<String> {
        index
            .cells_for(rule)
            .into_iter()
            .flat_map(|cell| self.data_cleaner.split_list(cell))
            .collect()
    }

    fn apply_rule(&self, index: &ColumnIndex<'_>, rule: &FieldRule, record: &mut CustomerRecord) {
        match rule.kind {
            FieldKind::Money { fallback } => {
                record.insert(rule.name, FieldValue::Number(self.money(index, rule, fallback)));
            }
            FieldKind::Date => {
                let date = index
                    .cells_for(rule)
                    .first()
                    .and_then(|cell| self.data_cleaner.parse_date(cell));
                if let Some(date) = date {
                    record.insert(rule.name, FieldValue::Date(date));
                }
            }
            FieldKind::PhoneList => {
                record.insert(rule.name, FieldValue::List(self.phone_list(index, rule)));
            }
            FieldKind::List => {
                record.insert(rule.name, FieldValue::List(self.text_list(index, rule)));
            }
            FieldKind::Identifier {
                strip_leading_hyphen,
            } => {
                let value = index.cells_for(rule).into_iter().find_map(|cell| {
                    self.data_cleaner
                        .clean_identifier(cell, strip_leading_hyphen)
                });
                if let Some(value) = value {
                    record.insert(rule.name, FieldValue::Text(value));
                }
            }
        }
    }
}

impl FieldNormalizerTrait for FieldNormalizer {
    fn normalize(&self, row: &RawRow) -> CustomerRecord {
        let index = ColumnIndex::new(row);
        let mut record = CustomerRecord::new();

        for rule in FIELD_RULES {
            self.apply_rule(&index, rule, &mut record);
        }

        // 无规则列原样透传
        for (header, value) in row {
            let key = self.data_cleaner.clean_text(header);
            if key.is_empty() || self.consumed.contains(&key.to_ascii_lowercase()) {
                continue;
            }
            record.insert(key, FieldValue::Cell(value.clone()));
        }

        record
    }
}
