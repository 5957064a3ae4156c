//! File name normalization.
//!
//! Base names are transliterated from Ukrainian Cyrillic to Latin and every
//! character outside letters, digits and underscore becomes `_`. Extensions
//! are never passed through here; callers reattach them verbatim.

use regex::Regex;
use std::sync::LazyLock;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").expect("valid disallowed-character pattern"));

/// Latin replacement for a Cyrillic letter, or `None` if `c` is not in the table.
///
/// The soft sign maps to the empty string.
fn transliterate_char(c: char) -> Option<&'static str> {
    let latin = match c {
        'А' => "A",
        'Б' => "B",
        'В' => "V",
        'Г' => "H",
        'Ґ' => "G",
        'Д' => "D",
        'Е' => "E",
        'Є' => "YE",
        'Ж' => "ZH",
        'З' => "Z",
        'И' => "Y",
        'І' => "I",
        'Ї' => "YI",
        'К' => "K",
        'Л' => "L",
        'М' => "M",
        'Н' => "N",
        'О' => "O",
        'П' => "P",
        'Р' => "R",
        'С' => "S",
        'Т' => "T",
        'У' => "U",
        'Ф' => "F",
        'Х' => "KH",
        'Ц' => "TS",
        'Ч' => "CH",
        'Ш' => "SH",
        'Щ' => "SCH",
        'Ь' => "",
        'Ю' => "YU",
        'Я' => "YA",
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'ґ' => "g",
        'д' => "d",
        'е' => "e",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'і' => "i",
        'ї' => "yi",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Replaces each Cyrillic letter from the table with its Latin spelling.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match transliterate_char(c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Normalizes a base name (the file name without its extension).
///
/// # Examples
///
/// ```
/// use clean_folder::normalize::normalize;
///
/// assert_eq!(normalize("архів"), "arkhiv");
/// assert_eq!(normalize("my photo (1)"), "my_photo__1_");
/// assert_eq!(normalize("сіль"), "sil");
/// ```
pub fn normalize(base_name: &str) -> String {
    DISALLOWED
        .replace_all(&transliterate(base_name), "_")
        .into_owned()
}

/// Normalizes the base name and reattaches the extension untouched.
pub fn normalized_file_name(base_name: &str, extension: &str) -> String {
    let normalized = normalize(base_name);
    if extension.is_empty() {
        normalized
    } else {
        format!("{}.{}", normalized, extension)
    }
}
