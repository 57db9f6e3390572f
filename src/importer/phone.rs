// ==========================================
// 催收名单导入系统 - 电话号码标准化
// ==========================================
// 职责: 手机/座机号码统一为本地 11 位（手机）或 0 + 区号 + 7 位（座机）格式
// 红线: 无法识别的号码保留清洗后的原值,不报错
// ==========================================

use once_cell::sync::Lazy;
use regex::Regex;

/// 多号码目录单元格的标记文本
pub const PHONE_DIRECTORY_MARKER: &str = "PHONE MOBILE1";

/// 号码匹配后的改写方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
    /// 已是本地格式,原样保留
    Keep,
    /// 国家码 63（含前导 `+`）替换为 0
    CountryCodeToZero,
    /// 数字单元格丢失的前导 0 补回
    RestoreLeadingZero,
}

/// 按顺序匹配的号码规则；清洗后仅保留开头的 `+`,供 (c)/(f) 匹配
static PHONE_PATTERNS: Lazy<Vec<(Regex, Rewrite)>> = Lazy::new(|| {
    [
        // (a) 本地手机
        (r"^09\d{9}$", Rewrite::Keep),
        // (b) 国家码手机
        (r"^63(9\d{9})$", Rewrite::CountryCodeToZero),
        // (c) +63 手机
        (r"^\+63(9\d{9})$", Rewrite::CountryCodeToZero),
        // (d) 本地座机
        (r"^0\d{1,2}\d{7}$", Rewrite::Keep),
        // (e) 国家码座机
        (r"^63(\d{1,2}\d{7})$", Rewrite::CountryCodeToZero),
        // (f) +63 座机
        (r"^\+63(\d{1,2}\d{7})$", Rewrite::CountryCodeToZero),
        // 数字单元格中的手机号: 9 + 9 位
        (r"^(9\d{9})$", Rewrite::RestoreLeadingZero),
    ]
    .into_iter()
    .filter_map(|(pattern, rewrite)| Regex::new(pattern).ok().map(|re| (re, rewrite)))
    .collect()
});

static DIRECTORY_ENTRY: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"PHONE MOBILE\d+\s*:\s*(\d{10,11})\b").ok());

/// 去掉 `-` 空格 括号及非开头的 `+`；含 `/` 时只保留第一个 `/` 之前的部分
pub fn clean_phone(raw: &str) -> String {
    let first = raw.split('/').next().unwrap_or("").trim();
    let (plus, rest) = match first.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", first),
    };
    let digits: String = rest
        .chars()
        .filter(|c| !matches!(c, '+' | '-' | '(' | ')') && !c.is_whitespace())
        .collect();
    format!("{plus}{digits}")
}

/// 标准化单个号码
///
/// 已标准化的号码原样返回（不动点）。无法识别时返回去掉 `+` 的清洗结果。
pub fn canonicalize_phone(raw: &str) -> String {
    let cleaned = clean_phone(raw);

    for (pattern, rewrite) in PHONE_PATTERNS.iter() {
        let Some(caps) = pattern.captures(&cleaned) else {
            continue;
        };
        match (rewrite, caps.get(1)) {
            (Rewrite::Keep, _) => return cleaned,
            (Rewrite::CountryCodeToZero | Rewrite::RestoreLeadingZero, Some(local)) => {
                return format!("0{}", local.as_str());
            }
            _ => {}
        }
    }

    cleaned.trim_start_matches('+').to_string()
}

/// 是否为多号码目录单元格
pub fn is_phone_directory(cell: &str) -> bool {
    cell.contains(PHONE_DIRECTORY_MARKER)
}

/// 从目录单元格中提取全部带标签号码并逐个标准化
pub fn extract_directory_phones(cell: &str) -> Vec<String> {
    let Some(entry) = DIRECTORY_ENTRY.as_ref() else {
        return Vec::new();
    };

    entry
        .captures_iter(cell)
        .filter_map(|caps| caps.get(1))
        .map(|m| canonicalize_phone(m.as_str()))
        .collect()
}

/// 解析一个联系方式单元格为号码列表
///
/// - 目录单元格: 提取全部带标签号码
/// - 普通单元格: 按逗号拆分后逐个标准化,空段忽略
pub fn phones_from_cell(cell: &str) -> Vec<String> {
    if is_phone_directory(cell) {
        return extract_directory_phones(cell);
    }

    cell.split(',')
        .map(canonicalize_phone)
        .filter(|p| !p.is_empty())
        .collect()
}
