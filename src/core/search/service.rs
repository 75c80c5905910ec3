//! Search execution over the page index.
//!
//! Translates a `SearchRequest` into a tantivy query, collects the
//! requested page of hits and assembles the response envelope.

use crate::core::config::SearchConfig;
use crate::core::error::{Result, SearchError};
use crate::core::search::request::{
    FacetResult, Hit, QueryClause, SearchRequest, SearchResponse, SearchStatus, TermCount,
};
use crate::core::storage::schema::{FACET_FIELDS, STORED_FIELDS, TEXT_FIELDS};
use crate::core::storage::{PageFields, PageIndex};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tantivy::collector::{Count, DocSetCollector, TopDocs};
use tantivy::query::{AllQuery, BooleanQuery, PhraseQuery, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::tokenizer::TokenStream;
use tantivy::{DocAddress, Score, Searcher, SnippetGenerator, TantivyDocument, Term};

/// Boost applied to title matches in query strings
const TITLE_BOOST: Score = 2.0;

/// Fields a `match` clause may target
const MATCH_FIELDS: &[&str] = &["title", "content", "tags", "categories", "section"];

/// Hit ordering requested through `sort`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Score { descending: bool },
    Date { descending: bool },
    Title { descending: bool },
}

impl SortOrder {
    /// Parse the first sort key; `-` prefix means descending
    ///
    /// No key sorts by descending score.
    pub fn parse(keys: &[String]) -> Result<Self> {
        let Some(key) = keys.first() else {
            return Ok(SortOrder::Score { descending: true });
        };

        let (descending, name) = match key.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, key.as_str()),
        };

        match name {
            "_score" => Ok(SortOrder::Score { descending }),
            "date" => Ok(SortOrder::Date { descending }),
            "title" => Ok(SortOrder::Title { descending }),
            other => Err(SearchError::invalid_field(
                other,
                "sort supports _score, date and title",
            )),
        }
    }
}

struct FacetSpec<'a> {
    name: &'a str,
    field_name: &'a str,
    field: Field,
    size: usize,
}

/// Search service bound to one named index
pub struct SearchService {
    index: Arc<PageIndex>,
    index_name: String,
    config: SearchConfig,
}

impl SearchService {
    /// Create a new search service
    pub fn new(index: Arc<PageIndex>, index_name: impl Into<String>, config: SearchConfig) -> Self {
        Self {
            index,
            index_name: index_name.into(),
            config,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn index(&self) -> &Arc<PageIndex> {
        &self.index
    }

    /// Execute a search request
    ///
    /// # Errors
    ///
    /// - `InvalidQuery`: empty, oversized or unparsable query
    /// - `InvalidField`: unknown match, facet, highlight or sort field
    /// - `SearchFailed`: tantivy failed while collecting
    pub fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        let start = Instant::now();
        let fields = *self.index.fields();

        let query = self.build_query(&request.query)?;
        let sort = SortOrder::parse(&request.sort)?;
        let facets = self.facet_specs(&request)?;
        let returned_fields = select_fields(request.fields.as_deref());
        let highlight_fields = highlight_fields(&request, &fields)?;

        let size = request.size.unwrap_or(self.config.default_size).min(self.config.max_size);
        let from = request.from;

        let searcher = self.index.searcher();

        let (total_hits, best) = searcher
            .search(&*query, &(Count, TopDocs::with_limit(1)))
            .map_err(search_failed)?;
        let total_hits = total_hits as u64;
        let max_score = best.first().map(|(score, _)| *score).unwrap_or(0.0);

        let needs_all = !facets.is_empty() || !matches!(sort, SortOrder::Score { .. });
        let all_docs = if needs_all && total_hits > 0 {
            let addresses = searcher
                .search(&*query, &DocSetCollector)
                .map_err(search_failed)?;
            let mut docs = Vec::with_capacity(addresses.len());
            for address in addresses {
                docs.push((address, load(&searcher, address)?));
            }
            docs
        } else {
            Vec::new()
        };

        let page = match sort {
            SortOrder::Score { descending } => {
                self.score_page(&searcher, &*query, descending, total_hits, from, size)?
            }
            SortOrder::Date { descending } => {
                let keyed = all_docs
                    .iter()
                    .map(|(addr, doc)| (*addr, fields.date(doc), fields.text(doc, fields.id)));
                let ordered = sort_by_key(keyed, descending);
                score_addresses(&searcher, &*query, paginate(ordered, from, size))?
            }
            SortOrder::Title { descending } => {
                let keyed = all_docs.iter().map(|(addr, doc)| {
                    let title = fields.text(doc, fields.title).to_lowercase();
                    (*addr, Some(title), fields.text(doc, fields.id))
                });
                let ordered = sort_by_key(keyed, descending);
                score_addresses(&searcher, &*query, paginate(ordered, from, size))?
            }
        };

        let snippet_generators = highlight_fields
            .iter()
            .map(|(name, field)| {
                let mut generator = SnippetGenerator::create(&searcher, &*query, *field)
                    .map_err(search_failed)?;
                generator.set_max_num_chars(self.config.snippet_max_chars);
                Ok((*name, generator))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut hits = Vec::with_capacity(page.len());
        for (score, address) in page {
            let doc = load(&searcher, address)?;

            let hit_fields = returned_fields
                .as_ref()
                .map(|names| fields.render(&doc, names));

            let fragments = if snippet_generators.is_empty() {
                None
            } else {
                let mut fragments = BTreeMap::new();
                for (name, generator) in &snippet_generators {
                    let mut snippet = generator.snippet_from_doc(&doc);
                    if snippet.highlighted().is_empty() {
                        continue;
                    }
                    snippet.set_snippet_prefix_postfix("<mark>", "</mark>");
                    fragments.insert(name.to_string(), vec![snippet.to_html()]);
                }
                Some(fragments)
            };

            hits.push(Hit {
                index: self.index_name.clone(),
                id: fields.text(&doc, fields.id),
                score,
                fields: hit_fields,
                fragments,
            });
        }

        let facet_results = facets
            .iter()
            .map(|spec| {
                let result = count_facet(&fields, spec, all_docs.iter().map(|(_, doc)| doc));
                (spec.name.to_string(), result)
            })
            .collect();

        let took = start.elapsed().as_nanos() as u64;

        tracing::debug!(
            index = %self.index_name,
            total_hits,
            returned = hits.len(),
            took_ns = took,
            "Search complete"
        );

        Ok(SearchResponse {
            status: SearchStatus::ok(),
            request,
            hits,
            total_hits,
            max_score,
            took,
            facets: facet_results,
        })
    }

    /// Translate a query clause into a tantivy query
    pub fn build_query(&self, clause: &QueryClause) -> Result<Box<dyn Query>> {
        let fields = self.index.fields();

        match clause {
            QueryClause::MatchAll { .. } => Ok(Box::new(AllQuery)),
            QueryClause::QueryString { query } | QueryClause::Bare(query) => {
                self.validate_text(query)?;

                let mut parser = QueryParser::for_index(
                    self.index.index(),
                    vec![fields.title, fields.content, fields.tags],
                );
                parser.set_field_boost(fields.title, TITLE_BOOST);

                parser
                    .parse_query(query)
                    .map_err(|e| SearchError::InvalidQuery(format!("Failed to parse query: {e}")))
            }
            QueryClause::Match { text, field } => {
                self.validate_text(text)?;
                let name = field.as_deref().unwrap_or("content");
                let field = match_field(fields, name, MATCH_FIELDS)?;

                let terms = self.analyze(field, text)?;
                if terms.is_empty() {
                    return Err(SearchError::InvalidQuery(
                        "Match text has no searchable terms".to_string(),
                    ));
                }
                Ok(Box::new(BooleanQuery::new_multiterms_query(terms)))
            }
            QueryClause::MatchPhrase { match_phrase, field } => {
                self.validate_text(match_phrase)?;
                let name = field.as_deref().unwrap_or("content");
                let field = match_field(fields, name, TEXT_FIELDS)?;

                let mut terms = self.analyze(field, match_phrase)?;
                match terms.len() {
                    0 => Err(SearchError::InvalidQuery(
                        "Phrase has no searchable terms".to_string(),
                    )),
                    1 => Ok(Box::new(TermQuery::new(
                        terms.remove(0),
                        IndexRecordOption::WithFreqs,
                    ))),
                    _ => Ok(Box::new(PhraseQuery::new(terms))),
                }
            }
        }
    }

    fn validate_text(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(SearchError::InvalidQuery(
                "Query cannot be empty".to_string(),
            ));
        }

        let length = text.chars().count();
        if length > self.config.max_query_length {
            return Err(SearchError::InvalidQuery(format!(
                "Query is {length} characters, limit is {}",
                self.config.max_query_length
            )));
        }

        Ok(())
    }

    /// Run `text` through the field's tokenizer
    fn analyze(&self, field: Field, text: &str) -> Result<Vec<Term>> {
        let mut analyzer = self
            .index
            .index()
            .tokenizer_for_field(field)
            .map_err(search_failed)?;

        let mut terms = Vec::new();
        let mut stream = analyzer.token_stream(text);
        stream.process(&mut |token| terms.push(Term::from_field_text(field, &token.text)));

        Ok(terms)
    }

    fn facet_specs<'a>(&self, request: &'a SearchRequest) -> Result<Vec<FacetSpec<'a>>> {
        let fields = self.index.fields();

        request
            .facets
            .iter()
            .map(|(name, facet)| {
                if !FACET_FIELDS.contains(&facet.field.as_str()) {
                    return Err(SearchError::invalid_field(
                        &facet.field,
                        format!("facets are available on {}", FACET_FIELDS.join(", ")),
                    ));
                }
                let field = fields
                    .by_name(&facet.field)
                    .ok_or_else(|| SearchError::invalid_field(&facet.field, "unknown field"))?;

                Ok(FacetSpec {
                    name: name.as_str(),
                    field_name: facet.field.as_str(),
                    field,
                    size: facet.size,
                })
            })
            .collect()
    }

    /// One page of hits in score order
    fn score_page(
        &self,
        searcher: &Searcher,
        query: &dyn Query,
        descending: bool,
        total_hits: u64,
        from: usize,
        size: usize,
    ) -> Result<Vec<(Score, DocAddress)>> {
        if size == 0 || total_hits == 0 || from as u64 >= total_hits {
            return Ok(Vec::new());
        }

        if descending {
            return searcher
                .search(query, &TopDocs::with_limit(size).and_offset(from))
                .map_err(search_failed);
        }

        let mut all = searcher
            .search(query, &TopDocs::with_limit(total_hits as usize))
            .map_err(search_failed)?;
        all.reverse();
        Ok(all.into_iter().skip(from).take(size).collect())
    }
}

/// Resolve the `fields` option into stored field names
fn select_fields(requested: Option<&[String]>) -> Option<Vec<&'static str>> {
    let requested = requested?;

    if requested.iter().any(|name| name == "*") {
        return Some(STORED_FIELDS.to_vec());
    }

    Some(
        STORED_FIELDS
            .iter()
            .copied()
            .filter(|stored| requested.iter().any(|name| name == stored))
            .collect(),
    )
}

fn highlight_fields(
    request: &SearchRequest,
    fields: &PageFields,
) -> Result<Vec<(&'static str, Field)>> {
    let Some(highlight) = &request.highlight else {
        return Ok(Vec::new());
    };

    let names: Vec<&str> = match &highlight.fields {
        Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
        _ => vec!["content"],
    };

    names
        .into_iter()
        .map(|name| {
            let stored = TEXT_FIELDS
                .iter()
                .copied()
                .find(|text_field| *text_field == name)
                .ok_or_else(|| {
                    SearchError::invalid_field(name, "highlighting supports title and content")
                })?;
            let field = fields
                .by_name(stored)
                .ok_or_else(|| SearchError::invalid_field(name, "unknown field"))?;
            Ok((stored, field))
        })
        .collect()
}

fn match_field(fields: &PageFields, name: &str, allowed: &[&str]) -> Result<Field> {
    if !allowed.contains(&name) {
        return Err(SearchError::invalid_field(
            name,
            format!("expected one of {}", allowed.join(", ")),
        ));
    }

    fields
        .by_name(name)
        .ok_or_else(|| SearchError::invalid_field(name, "unknown field"))
}

fn count_facet<'d>(
    fields: &PageFields,
    spec: &FacetSpec<'_>,
    docs: impl Iterator<Item = &'d TantivyDocument>,
) -> FacetResult {
    let mut counts: HashMap<String, u64> = HashMap::new();
    let mut missing = 0;

    for doc in docs {
        let values = fields.strings(doc, spec.field);
        if values.is_empty() {
            missing += 1;
        }
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
    }

    let total: u64 = counts.values().sum();

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(spec.size);

    let listed: u64 = terms.iter().map(|t| t.count).sum();

    FacetResult {
        field: spec.field_name.to_string(),
        total,
        missing,
        other: total - listed,
        terms,
    }
}

/// Order documents by key; missing keys sort last in both directions
fn sort_by_key<K: Ord>(
    keyed: impl Iterator<Item = (DocAddress, Option<K>, String)>,
    descending: bool,
) -> Vec<DocAddress> {
    let mut keyed: Vec<_> = keyed.collect();
    keyed.sort_by(|(_, a, id_a), (_, b, id_b)| {
        let by_key = match (a, b) {
            (Some(a), Some(b)) if descending => b.cmp(a),
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_key.then_with(|| id_a.cmp(id_b))
    });
    keyed.into_iter().map(|(addr, _, _)| addr).collect()
}

fn paginate(ordered: Vec<DocAddress>, from: usize, size: usize) -> Vec<DocAddress> {
    ordered.into_iter().skip(from).take(size).collect()
}

fn score_addresses(
    searcher: &Searcher,
    query: &dyn Query,
    addresses: Vec<DocAddress>,
) -> Result<Vec<(Score, DocAddress)>> {
    addresses
        .into_iter()
        .map(|address| {
            let explanation = query.explain(searcher, address).map_err(search_failed)?;
            Ok((explanation.value(), address))
        })
        .collect()
}

fn load(searcher: &Searcher, address: DocAddress) -> Result<TantivyDocument> {
    searcher
        .doc(address)
        .map_err(|e| SearchError::SearchFailed(format!("Failed to retrieve document: {e}")))
}

fn search_failed(e: tantivy::TantivyError) -> SearchError {
    SearchError::SearchFailed(e.to_string())
}
