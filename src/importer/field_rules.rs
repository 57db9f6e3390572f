// ==========================================
// 催收名单导入系统 - 标准字段规则表
// ==========================================
// 职责: 标准字段名 → {源列, 转换类型, 默认值}
// 说明: 规则表由 FieldNormalizer 统一解释执行,新增字段只改此表
// ==========================================

use std::collections::HashSet;

/// 字段转换类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 金额: 非负数,不可解析时取 fallback 字段的源单元格,再不行取 0
    Money { fallback: Option<&'static str> },
    /// 日期: YYYY-MM-DD,不可解析时省略字段
    Date,
    /// 电话列表: 多列合并 + 号码标准化
    PhoneList,
    /// 文本列表: 多列合并,逗号拆分
    List,
    /// 标识字段: TRIM,可选去掉一个前导连字符
    Identifier { strip_leading_hyphen: bool },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// 标准字段名
    pub name: &'static str,
    /// 源列名（不区分大小写,按顺序合并/取第一个非空）
    pub sources: &'static [&'static str],
    pub kind: FieldKind,
}

const fn money(name: &'static str, sources: &'static [&'static str]) -> FieldRule {
    FieldRule {
        name,
        sources,
        kind: FieldKind::Money { fallback: None },
    }
}

const fn money_or(
    name: &'static str,
    sources: &'static [&'static str],
    fallback: &'static str,
) -> FieldRule {
    FieldRule {
        name,
        sources,
        kind: FieldKind::Money {
            fallback: Some(fallback),
        },
    }
}

const fn date(name: &'static str) -> FieldRule {
    FieldRule {
        name,
        sources: &[],
        kind: FieldKind::Date,
    }
}

const fn ident(name: &'static str) -> FieldRule {
    FieldRule {
        name,
        sources: &[],
        kind: FieldKind::Identifier {
            strip_leading_hyphen: false,
        },
    }
}

/// 标准字段规则表
pub static FIELD_RULES: &[FieldRule] = &[
    // ===== 金额字段 =====
    money_or("principal", &["principal"], "total_os"),
    money("interest", &["interest"]),
    money("admin_fee", &["admin_fee"]),
    money("transaction_fee", &["transaction_fee"]),
    money("late_charge", &["late_charge"]),
    money("penalty_interest", &["penalty_interest"]),
    money("dst_fee", &["dst_fee", "documentary_stamp_fee"]),
    money("writeoff_balance", &["writeoff_balance", "write_off_balance"]),
    money("cf", &["cf", "carry_forward"]),
    money("past_due_amount", &["past_due_amount"]),
    money("overall_balance", &["overall_balance"]),
    money("mo_balance", &["mo_balance", "monthly_balance"]),
    money(
        "partial_payment_w_service_fee",
        &["partial_payment_w_service_fee", "partial_payment"],
    ),
    money("new_tad_with_sf", &["new_tad_with_sf", "new_total_amount_due"]),
    money("new_pay_off", &["new_pay_off", "new_payoff"]),
    money("service_fee", &["service_fee"]),
    money("last_payment_amount", &["last_payment_amount"]),
    money("mo_amort", &["mo_amort", "monthly_amortization"]),
    money_or("total_os", &["total_os"], "mo_amort"),
    money_or("balance", &["balance"], "total_os"),
    // ===== 日期字段 =====
    date("grass_date"),
    date("bill_due_date"),
    date("birthday"),
    date("endorsement_date"),
    date("last_payment_date"),
    // ===== 合并列表字段 =====
    FieldRule {
        name: "contact_no",
        sources: &[
            "contact_no",
            "emergency_contact_mobile_number",
            "contact_no_2",
            "contact_no_3",
        ],
        kind: FieldKind::PhoneList,
    },
    FieldRule {
        name: "address",
        sources: &["address", "address_2", "address_3"],
        kind: FieldKind::List,
    },
    FieldRule {
        name: "email",
        sources: &["email", "email_2", "email_3"],
        kind: FieldKind::List,
    },
    // ===== 标识字段 =====
    FieldRule {
        name: "case_id",
        sources: &[],
        kind: FieldKind::Identifier {
            strip_leading_hyphen: true,
        },
    },
    ident("platform_user_id"),
    ident("batch_no"),
    ident("brand"),
    ident("model"),
    ident("year"),
];

impl FieldRule {
    /// 源列名（未声明时与标准字段同名）
    pub fn source_columns(&self) -> Vec<&'static str> {
        if self.sources.is_empty() {
            vec![self.name]
        } else {
            self.sources.to_vec()
        }
    }
}

/// 按标准字段名查找规则
pub fn rule_for(name: &str) -> Option<&'static FieldRule> {
    FIELD_RULES.iter().find(|rule| rule.name == name)
}

/// 所有被规则消费的源列（小写）
pub fn consumed_columns() -> HashSet<String> {
    FIELD_RULES
        .iter()
        .flat_map(|rule| rule.source_columns())
        .map(str::to_ascii_lowercase)
        .collect()
}
