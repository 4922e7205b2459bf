//! 语言选择
//!
//! 语言代码原样传给后端，这张表只用于展示和校验提示。

use phf::phf_map;

/// 默认语言，等于它时不做翻译
pub const DEFAULT_LANGUAGE: &str = "en";

/// 语言代码 → 显示名称
static LANGUAGES: phf::Map<&'static str, &'static str> = phf_map! {
    "en" => "English",
    "hi" => "हिन्दी",
    "bn" => "বাংলা",
    "ta" => "தமிழ்",
    "te" => "తెలుగు",
    "mr" => "मराठी",
    "fr" => "Français",
    "es" => "Español",
    "de" => "Deutsch",
    "zh" => "中文",
    "ar" => "العربية",
    "pt" => "Português",
};

/// 是否需要翻译
pub fn needs_translation(lang: &str) -> bool {
    lang != DEFAULT_LANGUAGE
}

/// 获取语言显示名称
pub fn display_name(code: &str) -> Option<&'static str> {
    LANGUAGES.get(code).copied()
}

/// 是否是已知语言
pub fn is_known(code: &str) -> bool {
    LANGUAGES.contains_key(code)
}

/// 所有已知语言，按代码排序
pub fn all() -> Vec<(&'static str, &'static str)> {
    let mut languages: Vec<_> = LANGUAGES.entries().map(|(k, v)| (*k, *v)).collect();
    languages.sort_by_key(|(code, _)| *code);
    languages
}
