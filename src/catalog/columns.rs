//! Header sniffing for word list spreadsheets

/// Exact header names (lowercased, trimmed) that mark the word column
const WORD_HEADERS: [&str; 4] = ["word", "words", "spelling", "term"];

/// Substrings that mark a definition column
const DEFINITION_KEYWORDS: [&str; 4] = ["def", "mean", "desc", "explan"];

/// Substrings that mark an example sentence column
const SENTENCE_KEYWORDS: [&str; 3] = ["sentence", "example", "sample"];

/// Non-blank values inspected for the long-second-column fallback
const DEFINITION_SAMPLE_SIZE: usize = 5;

/// Average length above which an unlabelled second column reads as definitions
const DEFINITION_MIN_AVG_LEN: f64 = 20.0;

/// Column index mapping
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub word: usize,
    pub definition: Option<usize>,
    pub sentence: Option<usize>,
}

impl ColumnMapping {
    /// Pull the mapped cells out of one data row
    pub fn extract<'a>(&self, row: &'a [String]) -> (&'a str, Option<&'a str>, Option<&'a str>) {
        let cell = |i: usize| row.get(i).map(String::as_str);
        (
            cell(self.word).unwrap_or(""),
            self.definition.and_then(cell),
            self.sentence.and_then(cell),
        )
    }
}

/// Detect column indices from header names, peeking at data rows when the
/// headers say nothing about definitions
pub fn detect_columns(headers: &[String], rows: &[Vec<String>]) -> ColumnMapping {
    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let word = normalized
        .iter()
        .position(|h| WORD_HEADERS.contains(&h.as_str()))
        .unwrap_or(0);

    let definition = normalized
        .iter()
        .enumerate()
        .find(|(i, h)| *i != word && DEFINITION_KEYWORDS.iter().any(|k| h.contains(k)))
        .map(|(i, _)| i)
        .or_else(|| long_second_column(word, normalized.len(), rows));

    let sentence = normalized
        .iter()
        .enumerate()
        .find(|(i, h)| {
            *i != word && Some(*i) != definition && SENTENCE_KEYWORDS.iter().any(|k| h.contains(k))
        })
        .map(|(i, _)| i);

    ColumnMapping {
        word,
        definition,
        sentence,
    }
}

fn long_second_column(word: usize, column_count: usize, rows: &[Vec<String>]) -> Option<usize> {
    const SECOND: usize = 1;
    if column_count <= SECOND || word == SECOND {
        return None;
    }

    let samples: Vec<usize> = rows
        .iter()
        .filter_map(|row| row.get(SECOND))
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .take(DEFINITION_SAMPLE_SIZE)
        .map(|v| v.chars().count())
        .collect();

    if samples.is_empty() {
        return None;
    }

    let avg = samples.iter().sum::<usize>() as f64 / samples.len() as f64;
    (avg > DEFINITION_MIN_AVG_LEN).then_some(SECOND)
}
