//! Locale selection for user-facing fallback messages
//!
//! Clients send free-form language names ("Turkish", "Türkçe", "tr-TR").
//! Fallback replies are written in the learner's own language when a
//! translation exists, English otherwise.

/// Supported locales
pub const SUPPORTED_LOCALES: &[&str] = &["en", "tr"];
pub const DEFAULT_LOCALE: &str = "en";

/// Map a language name or tag onto a supported locale
/// Accepts: "tr", "tr-TR", "Turkish", "Türkçe", "en_US", "English", etc.
pub fn locale_for_language(language: &str) -> &'static str {
    let language = language.trim().to_lowercase();

    let primary = language
        .split(|c: char| c == '-' || c == '_' || c == ',' || c.is_whitespace())
        .next()
        .unwrap_or(DEFAULT_LOCALE);

    match primary {
        "tr" | "turkish" | "türkçe" | "turkce" => "tr",
        _ => DEFAULT_LOCALE,
    }
}
