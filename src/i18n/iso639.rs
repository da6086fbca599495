// SPDX-License-Identifier: PMPL-1.0-or-later

//! ISO 639-1 language code validation and metadata.
//!
//! Used to validate the language list of the site configuration before any
//! dictionary is opened, so a typo like `sp` fails at startup instead of
//! surfacing as a missing dictionary file.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

/// All ISO 639-1 two-letter codes, sorted for binary search.
const ISO639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// Validates whether a string is a known ISO 639-1 two-letter language code.
///
/// Case-sensitive: codes must be lowercase, as they appear in output
/// directory names and `hreflang` attributes.
///
/// # Examples
/// ```
/// assert!(reroute_pages::i18n::is_valid_iso639_1("tl"));
/// assert!(reroute_pages::i18n::is_valid_iso639_1("gu"));
/// assert!(!reroute_pages::i18n::is_valid_iso639_1("xx"));
/// ```
pub fn is_valid_iso639_1(code: &str) -> bool {
    ISO639_1.binary_search(&code).is_ok()
}

/// English name of a language the site ships, for log lines and reports.
///
/// Dictionaries carry their own `meta.label`; this is the fallback used
/// before (or without) loading one.
pub fn language_name(code: &str) -> Option<&'static str> {
    match code {
        "en" => Some("English"),
        "es" => Some("Spanish"),
        "zh" => Some("Chinese"),
        "tl" => Some("Tagalog"),
        "ko" => Some("Korean"),
        "pt" => Some("Portuguese"),
        "gu" => Some("Gujarati"),
        "hi" => Some("Hindi"),
        "it" => Some("Italian"),
        "ar" => Some("Arabic"),
        "pl" => Some("Polish"),
        _ => None,
    }
}
