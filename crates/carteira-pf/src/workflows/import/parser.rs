use super::normalizer::normalize_header;
use crate::workflows::portfolio::RawRow;

const CANDIDATE_DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Parsed upload: normalized headers plus one [`RawRow`] per data line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvBatch {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl CsvBatch {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub(crate) fn parse_batch(data: &[u8]) -> Result<CsvBatch, csv::Error> {
    let text = String::from_utf8_lossy(data);
    let delimiter = detect_delimiter(&text);

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(index, header)| (header.as_str(), record.get(index).unwrap_or("")))
            .collect();
        rows.push(row);
    }

    Ok(CsvBatch { headers, rows })
}

/// Picks the candidate delimiter appearing most often on the header line.
pub(crate) fn detect_delimiter(text: &str) -> u8 {
    let header_line = text.lines().next().unwrap_or_default();
    CANDIDATE_DELIMITERS
        .iter()
        .map(|delimiter| {
            let count = header_line
                .bytes()
                .filter(|byte| byte == delimiter)
                .count();
            (*delimiter, count)
        })
        .filter(|(_, count)| *count > 0)
        .max_by(|(a_delim, a_count), (b_delim, b_count)| {
            a_count
                .cmp(b_count)
                .then_with(|| delimiter_rank(*b_delim).cmp(&delimiter_rank(*a_delim)))
        })
        .map(|(delimiter, _)| delimiter)
        .unwrap_or(b',')
}

fn delimiter_rank(delimiter: u8) -> usize {
    CANDIDATE_DELIMITERS
        .iter()
        .position(|candidate| *candidate == delimiter)
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_semicolon_exports() {
        assert_eq!(detect_delimiter("CPF;Nome;Renda\n1;Ana;3000,00\n"), b';');
        assert_eq!(detect_delimiter("CPF,Nome\n"), b',');
        assert_eq!(detect_delimiter("CPF\tNome\tRenda\n"), b'\t');
        assert_eq!(detect_delimiter("CPF\n"), b',');
    }

    #[test]
    fn ties_prefer_semicolon() {
        assert_eq!(detect_delimiter("a;b,c\n"), b';');
    }

    #[test]
    fn short_rows_are_padded_with_blanks() {
        let batch = parse_batch(b"CPF;Nome;Renda\n1;Ana\n").expect("parse");

        assert_eq!(batch.headers, vec!["CPF", "Nome", "Renda"]);
        assert_eq!(batch.rows[0].get("Nome"), Some("Ana"));
        assert_eq!(batch.rows[0].get("Renda"), Some(""));
    }

    #[test]
    fn header_only_file_is_empty_batch() {
        let batch = parse_batch("\u{feff}CPF;Nome\n".as_bytes()).expect("parse");

        assert!(batch.is_empty());
        assert_eq!(batch.headers, vec!["CPF", "Nome"]);
    }
}
