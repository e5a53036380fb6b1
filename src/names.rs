//! Name normalization and short-code utilities.
//!
//! Nominee names arrive as free text; members are keyed by their canonical
//! full name. [`normalize`] makes the two comparable: "José Pérez" and
//! "jose perez" collapse to the same key. The function is idempotent:
//! normalizing an already-normalized string is the identity.

/// Canonicalize a free-text name for matching: lowercase, fold diacritics,
/// drop everything that is not an ASCII letter, digit, or space, and
/// collapse whitespace runs to single spaces.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for c in name.to_lowercase().chars() {
        let folded = fold_diacritic(c);
        if folded.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if folded.is_ascii_alphanumeric() {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(folded);
        }
        // Anything else (punctuation, unfoldable symbols) is dropped.
    }
    out
}

/// Map an accented lowercase Latin letter to its unaccented base. Letters
/// outside the table pass through unchanged. Covers the Latin-1 Supplement
/// and the Latin Extended-A letters that survey rosters actually contain.
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

/// Title-case each whitespace-separated word: first letter uppercased, the
/// rest lowercased. Words are re-joined with single spaces.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut w: String = first.to_uppercase().collect();
                    w.extend(chars.flat_map(|c| c.to_lowercase()));
                    w
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Derive a 3–4 letter short code from name parts: the first letter of each
/// word of the given then family name, uppercased. Longer sequences are cut
/// to 4 letters; shorter ones are padded to 3 with 'X'. Accents are kept:
/// "Ángela Aguilar" yields "ÁAX".
pub fn initials_for(given: &str, family: &str) -> String {
    let mut letters = String::new();
    for part in given.split_whitespace().chain(family.split_whitespace()) {
        if let Some(first) = part.chars().next() {
            letters.extend(first.to_uppercase());
        }
    }
    if letters.is_empty() {
        return "N/A".to_string();
    }
    let count = letters.chars().count();
    if count > 4 {
        letters.chars().take(4).collect()
    } else {
        while letters.chars().count() < 3 {
            letters.push('X');
        }
        letters
    }
}
