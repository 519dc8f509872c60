//! In-memory catalog with websearch-style text search.

use super::{CatalogStore, PatternQuery, SearchLanguage, TextQuery};
use crate::error::{LoadError, StoreError};
use crate::types::CatalogEntry;
use futures::FutureExt;
use futures::future::BoxFuture;
use rust_stemmers::{Algorithm, Stemmer};
use std::path::Path;

/// Russian stop words dropped from both documents and queries.
pub(crate) const STOP_WORDS: &[&str] = &[
    "и", "в", "во", "на", "с", "со", "для", "по", "из", "к", "о", "от", "до", "без",
];

/// Websearch keyword separating alternative groups.
const OR_KEYWORD: &str = "or";

/// Entry plus its precomputed lexemes for each language.
#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: CatalogEntry,
    russian: Vec<String>,
    simple: Vec<String>,
}

impl IndexedEntry {
    fn lexemes(&self, language: SearchLanguage) -> &[String] {
        match language {
            SearchLanguage::Russian => &self.russian,
            SearchLanguage::Simple => &self.simple,
        }
    }
}

/// Immutable catalog held in memory. Cheap to share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: Vec<IndexedEntry>,
}

impl InMemoryCatalog {
    /// Index `entries` for both search languages up front.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let analyzer = Analyzer::default();
        let entries = entries
            .into_iter()
            .map(|entry| IndexedEntry {
                russian: analyzer.lexemes(&entry.name, SearchLanguage::Russian),
                simple: analyzer.lexemes(&entry.name, SearchLanguage::Simple),
                entry,
            })
            .collect();
        Self { entries }
    }

    /// Load a JSON array of entries. Every entry needs a non-empty `sku` and `name`.
    pub async fn from_json_file(path: &Path) -> Result<Self, LoadError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&content).map_err(|source| LoadError::Catalog {
                path: path.to_path_buf(),
                source,
            })?;

        for (index, entry) in entries.iter().enumerate() {
            if entry.sku.trim().is_empty() {
                return Err(LoadError::EmptyField { index, field: "sku" });
            }
            if entry.name.trim().is_empty() {
                return Err(LoadError::EmptyField { index, field: "name" });
            }
        }

        tracing::info!("Loaded {} catalog entries from {}", entries.len(), path.display());
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().map(|e| &e.entry)
    }

    fn run_text_search(&self, query: &TextQuery) -> Vec<CatalogEntry> {
        let parsed = WebQuery::parse(&query.text, query.language);
        if parsed.groups.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|e| parsed.matches(e.lexemes(query.language)))
            .take(query.limit)
            .map(|e| e.entry.clone())
            .collect()
    }

    fn run_pattern_search(&self, query: &PatternQuery) -> Vec<CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| query.filter.matches(&e.entry.name))
            .take(query.limit)
            .map(|e| e.entry.clone())
            .collect()
    }
}

impl CatalogStore for InMemoryCatalog {
    fn text_search<'a>(
        &'a self,
        query: &'a TextQuery,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>> {
        async move { Ok(self.run_text_search(query)) }.boxed()
    }

    fn pattern_search<'a>(
        &'a self,
        query: &'a PatternQuery,
    ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, StoreError>> {
        async move { Ok(self.run_pattern_search(query)) }.boxed()
    }

    fn entry_count(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Parsed websearch query: OR of groups, each an AND of lexemes with optional negations.
#[derive(Debug, Default, PartialEq, Eq)]
struct WebQuery {
    groups: Vec<QueryGroup>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct QueryGroup {
    required: Vec<String>,
    excluded: Vec<String>,
}

impl QueryGroup {
    fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}

impl WebQuery {
    fn parse(text: &str, language: SearchLanguage) -> Self {
        let analyzer = Analyzer::default();
        let mut groups = Vec::new();
        let mut current = QueryGroup::default();

        for word in text.split_whitespace() {
            if word.eq_ignore_ascii_case(OR_KEYWORD) {
                if !current.is_empty() {
                    groups.push(std::mem::take(&mut current));
                }
                continue;
            }
            match word.strip_prefix('-') {
                Some(negated) if !negated.is_empty() => {
                    current.excluded.extend(analyzer.lexemes(negated, language));
                }
                _ => current.required.extend(analyzer.lexemes(word, language)),
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }

        Self { groups }
    }

    fn matches(&self, lexemes: &[String]) -> bool {
        self.groups.iter().any(|group| {
            group.required.iter().all(|l| lexemes.contains(l))
                && !group.excluded.iter().any(|l| lexemes.contains(l))
        })
    }
}

/// Splits text into words and reduces them to lexemes.
struct Analyzer {
    russian: Stemmer,
    english: Stemmer,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            russian: Stemmer::create(Algorithm::Russian),
            english: Stemmer::create(Algorithm::English),
        }
    }
}

impl Analyzer {
    fn lexemes(&self, text: &str, language: SearchLanguage) -> Vec<String> {
        split_words(&text.to_lowercase())
            .into_iter()
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
            .map(|w| match language {
                SearchLanguage::Russian => self.stem(&w),
                SearchLanguage::Simple => w,
            })
            .collect()
    }

    /// Purely alphabetic words are stemmed by script; anything with digits is kept as is.
    fn stem(&self, word: &str) -> String {
        if !word.chars().all(char::is_alphabetic) {
            return word.to_string();
        }
        let cyrillic = word.chars().any(|c| matches!(c, 'а'..='я' | 'ё'));
        let stemmer = if cyrillic { &self.russian } else { &self.english };
        stemmer.stem(word).into_owned()
    }
}

/// Alphanumeric runs; `.` and `,` survive only between two digits (`4.2`, `4,2`).
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let decimal_mark = matches!(c, '.' | ',')
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);

        if c.is_alphanumeric() || decimal_mark {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternFilter;
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};
    use std::io::Write as _;

    #[fixture]
    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            CatalogEntry::new("B-933-8-100", "Болт M8x100 DIN 933 цинк"),
            CatalogEntry::new("B-933-8-80", "Болт М8х80 DIN 933 оцинкованный"),
            CatalogEntry::new("N-934-8", "Гайка M8 DIN 934"),
            CatalogEntry::new("S-4.2-90", "Саморез 4,2х90 по дереву"),
            CatalogEntry::new("W-125-8", "Шайба 8 DIN 125 100% сталь"),
        ])
    }

    fn text(text: &str) -> TextQuery {
        TextQuery {
            text: text.to_string(),
            language: SearchLanguage::Russian,
            limit: 20,
        }
    }

    fn skus(entries: &[CatalogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.sku.as_str()).collect()
    }

    #[rstest]
    #[case("Болт M8x100 цинк", &["болт", "m8x100", "цинк"])]
    #[case("Саморез 4,2х90 по дереву", &["саморез", "4,2х90", "дерев"])]
    #[case("M8 × 100", &["m8", "100"])]
    fn test_russian_lexemes(#[case] input: &str, #[case] expected: &[&str]) {
        let lexemes = Analyzer::default().lexemes(input, SearchLanguage::Russian);
        check!(lexemes == expected);
    }

    #[test]
    fn test_simple_lexemes_not_stemmed() {
        let lexemes = Analyzer::default().lexemes("Болты оцинкованные", SearchLanguage::Simple);
        check!(lexemes == ["болты", "оцинкованные"]);
    }

    #[test]
    fn test_stemming_matches_inflections() {
        let analyzer = Analyzer::default();
        check!(
            analyzer.lexemes("болты", SearchLanguage::Russian)
                == analyzer.lexemes("болт", SearchLanguage::Russian)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_text_search_and(catalog: InMemoryCatalog) {
        let_assert!(Ok(found) = catalog.text_search(&text("болт m8x100")).await);
        check!(skus(&found) == ["B-933-8-100"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_text_search_or_groups(catalog: InMemoryCatalog) {
        let_assert!(Ok(found) = catalog.text_search(&text("болт M8x100 or болт М8х80")).await);
        check!(skus(&found) == ["B-933-8-100", "B-933-8-80"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_text_search_negation(catalog: InMemoryCatalog) {
        let_assert!(Ok(found) = catalog.text_search(&text("болт -цинк")).await);
        check!(skus(&found) == ["B-933-8-80"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_text_search_limit(catalog: InMemoryCatalog) {
        let mut query = text("болт");
        query.limit = 1;
        let_assert!(Ok(found) = catalog.text_search(&query).await);
        check!(found.len() == 1);
    }

    #[rstest]
    #[tokio::test]
    async fn test_text_search_empty_query(catalog: InMemoryCatalog) {
        let_assert!(Ok(found) = catalog.text_search(&text("  or  ")).await);
        check!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn test_pattern_search(catalog: InMemoryCatalog) {
        let query = PatternQuery {
            filter: PatternFilter::contains_any(&["din 934", "100%"]),
            limit: 20,
        };
        let_assert!(Ok(found) = catalog.pattern_search(&query).await);
        check!(skus(&found) == ["N-934-8", "W-125-8"]);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"sku": "A", "name": "Болт M8", "price": 1.5}}, {{"sku": "B", "name": "Гайка"}}]"#
        )
        .unwrap();

        let_assert!(Ok(catalog) = InMemoryCatalog::from_json_file(file.path()).await);
        check!(catalog.len() == 2);
        let first = catalog.entries().next().unwrap();
        check!(first.extra.get("price") == Some(&serde_json::json!(1.5)));
    }

    #[tokio::test]
    async fn test_load_rejects_empty_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"sku": "A", "name": " "}}]"#).unwrap();

        let result = InMemoryCatalog::from_json_file(file.path()).await;
        let_assert!(Err(LoadError::EmptyField { index: 0, field: "name" }) = result);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = InMemoryCatalog::from_json_file(Path::new("/nonexistent/catalog.json")).await;
        let_assert!(Err(LoadError::Io { .. }) = result);
    }
}
