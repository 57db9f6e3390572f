// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// 用途: 导入终态提示文案
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::import::ImportStatus;

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use callfile_import::i18n::t;
/// let msg = t("import.duplicate_batch_name");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use callfile_import::i18n::t_with_args;
/// let msg = t_with_args("import.all_succeeded", &[("count", "4500")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 导入终态的用户提示；成功时带上提交条数
pub fn status_message(status: ImportStatus, submitted: usize) -> String {
    match status {
        ImportStatus::AllSucceeded => {
            t_with_args(status.message_key(), &[("count", &submitted.to_string())])
        }
        other => t(other.message_key()),
    }
}
