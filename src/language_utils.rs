/*!
 * Language utilities for ISO language code handling.
 *
 * Recognizers report the detected language either as an ISO 639 code
 * ("en", "eng") or as an English name ("english"). These helpers fold both
 * into ISO 639-1 where one exists.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(mapped)
}

fn lookup_code(code: &str) -> Option<Language> {
    match code.len() {
        2 => Language::from_639_1(code),
        3 => {
            let part2t = bibliographic_to_terminology(code).unwrap_or(code);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

fn lookup_name(name: &str) -> Option<Language> {
    let mut chars = name.chars();
    let first = chars.next()?;
    let capitalized: String = first.to_uppercase().chain(chars).collect();
    Language::from_name(&capitalized)
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    let lang = lookup_code(&normalized_code)
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(lang
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Normalize a recognizer-reported language (code or English name).
///
/// Unknown values are passed through lowercased rather than rejected; the
/// language is informational only.
pub fn normalize_detected_language(language: &str) -> String {
    let trimmed = language.trim().to_lowercase();

    let lang = lookup_code(&trimmed).or_else(|| lookup_name(&trimmed));
    match lang {
        Some(lang) => lang
            .to_639_1()
            .map(str::to_string)
            .unwrap_or_else(|| lang.to_639_3().to_string()),
        None => trimmed,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let lang = lookup_code(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
