//! CQL query construction.

/// Characters that only appear in structured CQL.
const OPERATOR_CHARS: [char; 4] = ['~', '=', '<', '>'];

/// Boolean keywords that mark a query as structured.
const KEYWORDS: [&str; 3] = ["AND", "OR", "NOT"];

/// Whether `query` is already CQL rather than free text.
fn is_structured(query: &str) -> bool {
    query.contains(OPERATOR_CHARS)
        || query
            .split_whitespace()
            .any(|word| KEYWORDS.contains(&word))
}

/// Build a CQL string from a free-text or structured query.
///
/// Free text is wrapped as `text ~ "<query>"`; structured queries are used
/// as-is. The space filter and the content type restriction are appended
/// in that order, each parenthesizing what came before:
///
/// ```
/// use cfx_confluence::build_cql;
///
/// let cql = build_cql("test search", &["SPACE1", "SPACE2"], Some("page"));
/// assert_eq!(
///     cql,
///     r#"((text ~ "test search") AND (space = "SPACE1" OR space = "SPACE2")) AND type = page"#
/// );
/// ```
///
/// The query text is inserted literally. It is not escaped.
pub fn build_cql<S: AsRef<str>>(query: &str, spaces: &[S], content_type: Option<&str>) -> String {
    let mut cql = if is_structured(query) {
        query.trim().to_owned()
    } else {
        format!("text ~ \"{query}\"")
    };

    let space_clauses: Vec<String> = spaces
        .iter()
        .map(AsRef::as_ref)
        .filter(|key| !key.is_empty())
        .map(|key| format!("space = \"{key}\""))
        .collect();
    if !space_clauses.is_empty() {
        cql = format!("({cql}) AND ({})", space_clauses.join(" OR "));
    }

    if let Some(content_type) = content_type.filter(|t| !t.is_empty()) {
        cql = format!("({cql}) AND type = {content_type}");
    }

    cql
}
