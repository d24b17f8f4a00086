/// Cleans a header cell: drops BOM/zero-width characters and collapses whitespace.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lookup key for alias matching: lowercase, unaccented, `_`/`-` read as spaces.
pub(crate) fn normalize_key(value: &str) -> String {
    let header = normalize_header(value).to_lowercase();
    let unaccented: String = header
        .chars()
        .map(|ch| match ch {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            '_' | '-' | '.' | '/' => ' ',
            other => other,
        })
        .collect();
    unaccented.split_whitespace().collect::<Vec<_>>().join(" ")
}
