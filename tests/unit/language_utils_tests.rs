/*!
 * Tests for ISO language code utilities
 */

use srtscribe::language_utils::{get_language_name, normalize_detected_language, normalize_to_part1_or_part2t};

#[test]
fn test_normalize_withPart1AndPart2Codes_shouldPreferPart1() {
    assert_eq!(normalize_to_part1_or_part2t("en").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("EN").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t("fra").unwrap(), "fr");
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
}

#[test]
fn test_normalize_withInvalidCode_shouldFail() {
    assert!(normalize_to_part1_or_part2t("xx").is_err());
    assert!(normalize_to_part1_or_part2t("").is_err());
    assert!(normalize_to_part1_or_part2t("english").is_err());
}

#[test]
fn test_normalizeDetectedLanguage_withNamesAndCodes_shouldReturnCode() {
    assert_eq!(normalize_detected_language("english"), "en");
    assert_eq!(normalize_detected_language("German"), "de");
    assert_eq!(normalize_detected_language(" es "), "es");
    assert_eq!(normalize_detected_language("jpn"), "ja");
}

#[test]
fn test_normalizeDetectedLanguage_withUnknownValue_shouldPassThroughLowercased() {
    assert_eq!(normalize_detected_language("Klingon-ish"), "klingon-ish");
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert!(get_language_name("zz").is_err());
}
