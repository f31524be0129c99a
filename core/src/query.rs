//! Query, aggregation and sort value objects, and the search body they build.
//!
//! Only a small part of the query DSL is modelled; anything else can be sent
//! with `RawQuery` / `RawAggregation`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Map, Value};

/// A query clause that renders to its JSON form.
pub trait Query: fmt::Debug {
    fn source(&self) -> Value;
}

impl<Q: Query + ?Sized> Query for &Q {
    fn source(&self) -> Value {
        (**self).source()
    }
}

impl Query for Box<dyn Query> {
    fn source(&self) -> Value {
        (**self).source()
    }
}

fn with_boost(mut body: Map<String, Value>, boost: Option<f64>) -> Map<String, Value> {
    if let Some(boost) = boost {
        body.insert("boost".into(), json!(boost));
    }
    body
}

fn wrap(name: &str, body: Value) -> Value {
    let mut outer = Map::new();
    outer.insert(name.to_string(), body);
    Value::Object(outer)
}

/// Matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchAllQuery {
    boost: Option<f64>,
}

impl MatchAllQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl Query for MatchAllQuery {
    fn source(&self) -> Value {
        wrap("match_all", Value::Object(with_boost(Map::new(), self.boost)))
    }
}

/// Exact match on a single term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    field: String,
    value: Value,
    boost: Option<f64>,
}

impl TermQuery {
    pub fn new(field: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            value: value.into(),
            boost: None,
        }
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl Query for TermQuery {
    fn source(&self) -> Value {
        let inner = match self.boost {
            None => self.value.clone(),
            Some(boost) => json!({"value": self.value, "boost": boost}),
        };
        wrap("term", wrap(&self.field, inner))
    }
}

/// Matches any of several exact terms.
#[derive(Debug, Clone, PartialEq)]
pub struct TermsQuery {
    field: String,
    values: Vec<Value>,
    boost: Option<f64>,
}

impl TermsQuery {
    pub fn new<I, V>(field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
            boost: None,
        }
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl Query for TermsQuery {
    fn source(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.field.clone(), Value::Array(self.values.clone()));
        wrap("terms", Value::Object(with_boost(body, self.boost)))
    }
}

/// Full-text match on an analyzed field.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    field: String,
    text: Value,
    operator: Option<String>,
    analyzer: Option<String>,
    fuzziness: Option<String>,
    minimum_should_match: Option<String>,
    boost: Option<f64>,
}

impl MatchQuery {
    pub fn new(field: &str, text: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            text: text.into(),
            operator: None,
            analyzer: None,
            fuzziness: None,
            minimum_should_match: None,
            boost: None,
        }
    }

    /// `and` or `or`.
    pub fn operator(mut self, operator: &str) -> Self {
        self.operator = Some(operator.to_string());
        self
    }

    pub fn analyzer(mut self, analyzer: &str) -> Self {
        self.analyzer = Some(analyzer.to_string());
        self
    }

    pub fn fuzziness(mut self, fuzziness: &str) -> Self {
        self.fuzziness = Some(fuzziness.to_string());
        self
    }

    pub fn minimum_should_match(mut self, minimum: &str) -> Self {
        self.minimum_should_match = Some(minimum.to_string());
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl Query for MatchQuery {
    fn source(&self) -> Value {
        let mut body = Map::new();
        body.insert("query".into(), self.text.clone());
        let optional = [
            ("operator", &self.operator),
            ("analyzer", &self.analyzer),
            ("fuzziness", &self.fuzziness),
            ("minimum_should_match", &self.minimum_should_match),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body.insert(key.into(), json!(value));
            }
        }
        wrap("match", wrap(&self.field, Value::Object(with_boost(body, self.boost))))
    }
}

/// Bounds on a numeric, date or keyword field.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    field: String,
    gt: Option<Value>,
    gte: Option<Value>,
    lt: Option<Value>,
    lte: Option<Value>,
    format: Option<String>,
    time_zone: Option<String>,
    boost: Option<f64>,
}

impl RangeQuery {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            gt: None,
            gte: None,
            lt: None,
            lte: None,
            format: None,
            time_zone: None,
            boost: None,
        }
    }

    pub fn gt(mut self, value: impl Into<Value>) -> Self {
        self.gt = Some(value.into());
        self
    }

    pub fn gte(mut self, value: impl Into<Value>) -> Self {
        self.gte = Some(value.into());
        self
    }

    pub fn lt(mut self, value: impl Into<Value>) -> Self {
        self.lt = Some(value.into());
        self
    }

    pub fn lte(mut self, value: impl Into<Value>) -> Self {
        self.lte = Some(value.into());
        self
    }

    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn time_zone(mut self, time_zone: &str) -> Self {
        self.time_zone = Some(time_zone.to_string());
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl Query for RangeQuery {
    fn source(&self) -> Value {
        let mut body = Map::new();
        let bounds = [("gt", &self.gt), ("gte", &self.gte), ("lt", &self.lt), ("lte", &self.lte)];
        for (key, value) in bounds {
            if let Some(value) = value {
                body.insert(key.into(), value.clone());
            }
        }
        if let Some(format) = &self.format {
            body.insert("format".into(), json!(format));
        }
        if let Some(tz) = &self.time_zone {
            body.insert("time_zone".into(), json!(tz));
        }
        wrap("range", wrap(&self.field, Value::Object(with_boost(body, self.boost))))
    }
}

/// Boolean combination of other queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    must: Vec<Value>,
    filter: Vec<Value>,
    should: Vec<Value>,
    must_not: Vec<Value>,
    minimum_should_match: Option<String>,
    boost: Option<f64>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: impl Query) -> Self {
        self.must.push(query.source());
        self
    }

    pub fn filter(mut self, query: impl Query) -> Self {
        self.filter.push(query.source());
        self
    }

    pub fn should(mut self, query: impl Query) -> Self {
        self.should.push(query.source());
        self
    }

    pub fn must_not(mut self, query: impl Query) -> Self {
        self.must_not.push(query.source());
        self
    }

    pub fn minimum_should_match(mut self, minimum: &str) -> Self {
        self.minimum_should_match = Some(minimum.to_string());
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }
}

impl Query for BoolQuery {
    fn source(&self) -> Value {
        let mut body = Map::new();
        let clauses = [
            ("must", &self.must),
            ("filter", &self.filter),
            ("should", &self.should),
            ("must_not", &self.must_not),
        ];
        for (key, clause) in clauses {
            match clause.as_slice() {
                [] => {}
                [single] => {
                    body.insert(key.into(), single.clone());
                }
                many => {
                    body.insert(key.into(), Value::Array(many.to_vec()));
                }
            }
        }
        if let Some(minimum) = &self.minimum_should_match {
            body.insert("minimum_should_match".into(), json!(minimum));
        }
        wrap("bool", Value::Object(with_boost(body, self.boost)))
    }
}

/// A query given as literal JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuery(pub Value);

impl Query for RawQuery {
    fn source(&self) -> Value {
        self.0.clone()
    }
}

/// An aggregation that renders to its JSON form.
pub trait Aggregation: fmt::Debug {
    fn source(&self) -> Value;
}

impl<A: Aggregation + ?Sized> Aggregation for &A {
    fn source(&self) -> Value {
        (**self).source()
    }
}

fn aggregation_body(
    kind: &str,
    body: Map<String, Value>,
    sub_aggs: &BTreeMap<String, Value>,
    meta: &Option<Value>,
) -> Value {
    let mut outer = Map::new();
    outer.insert(kind.to_string(), Value::Object(body));
    if !sub_aggs.is_empty() {
        let subs: Map<String, Value> = sub_aggs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        outer.insert("aggregations".into(), Value::Object(subs));
    }
    if let Some(meta) = meta {
        outer.insert("meta".into(), meta.clone());
    }
    Value::Object(outer)
}

/// Buckets documents by the distinct values of a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermsAggregation {
    field: Option<String>,
    script: Option<Value>,
    size: Option<i64>,
    shard_size: Option<i64>,
    min_doc_count: Option<i64>,
    missing: Option<Value>,
    order: Vec<Value>,
    include: Option<Value>,
    exclude: Option<Value>,
    sub_aggs: BTreeMap<String, Value>,
    meta: Option<Value>,
}

impl TermsAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn script(mut self, script: Value) -> Self {
        self.script = Some(script);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn shard_size(mut self, size: i64) -> Self {
        self.shard_size = Some(size);
        self
    }

    pub fn min_doc_count(mut self, count: i64) -> Self {
        self.min_doc_count = Some(count);
        self
    }

    pub fn missing(mut self, value: impl Into<Value>) -> Self {
        self.missing = Some(value.into());
        self
    }

    /// Order buckets by `key` (e.g. `_count`, `_key` or a sub-aggregation).
    pub fn order(mut self, key: &str, ascending: bool) -> Self {
        self.order.push(wrap(key, json!(if ascending { "asc" } else { "desc" })));
        self
    }

    pub fn include(mut self, include: impl Into<Value>) -> Self {
        self.include = Some(include.into());
        self
    }

    pub fn exclude(mut self, exclude: impl Into<Value>) -> Self {
        self.exclude = Some(exclude.into());
        self
    }

    pub fn sub_aggregation(mut self, name: &str, aggregation: impl Aggregation) -> Self {
        self.sub_aggs.insert(name.to_string(), aggregation.source());
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl Aggregation for TermsAggregation {
    fn source(&self) -> Value {
        let mut body = Map::new();
        if let Some(field) = &self.field {
            body.insert("field".into(), json!(field));
        }
        let optional = [
            ("script", self.script.clone()),
            ("size", self.size.map(Value::from)),
            ("shard_size", self.shard_size.map(Value::from)),
            ("min_doc_count", self.min_doc_count.map(Value::from)),
            ("missing", self.missing.clone()),
            ("include", self.include.clone()),
            ("exclude", self.exclude.clone()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body.insert(key.into(), value);
            }
        }
        match self.order.as_slice() {
            [] => {}
            [single] => {
                body.insert("order".into(), single.clone());
            }
            many => {
                body.insert("order".into(), Value::Array(many.to_vec()));
            }
        }
        aggregation_body("terms", body, &self.sub_aggs, &self.meta)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum CompositeSourceKind {
    Terms,
    Histogram { interval: f64 },
    DateHistogram,
}

/// One value source of a composite aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeValuesSource {
    name: String,
    kind: CompositeSourceKind,
    field: Option<String>,
    script: Option<Value>,
    value_type: Option<String>,
    missing_bucket: Option<bool>,
    order: Option<String>,
    calendar_interval: Option<String>,
    fixed_interval: Option<String>,
    format: Option<String>,
    time_zone: Option<String>,
}

impl CompositeValuesSource {
    fn with_kind(name: &str, kind: CompositeSourceKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            field: None,
            script: None,
            value_type: None,
            missing_bucket: None,
            order: None,
            calendar_interval: None,
            fixed_interval: None,
            format: None,
            time_zone: None,
        }
    }

    pub fn terms(name: &str) -> Self {
        Self::with_kind(name, CompositeSourceKind::Terms)
    }

    pub fn histogram(name: &str, interval: f64) -> Self {
        Self::with_kind(name, CompositeSourceKind::Histogram { interval })
    }

    pub fn date_histogram(name: &str) -> Self {
        Self::with_kind(name, CompositeSourceKind::DateHistogram)
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn script(mut self, script: Value) -> Self {
        self.script = Some(script);
        self
    }

    pub fn value_type(mut self, value_type: &str) -> Self {
        self.value_type = Some(value_type.to_string());
        self
    }

    pub fn missing_bucket(mut self, missing_bucket: bool) -> Self {
        self.missing_bucket = Some(missing_bucket);
        self
    }

    pub fn asc(mut self) -> Self {
        self.order = Some("asc".into());
        self
    }

    pub fn desc(mut self) -> Self {
        self.order = Some("desc".into());
        self
    }

    /// Date histograms only.
    pub fn calendar_interval(mut self, interval: &str) -> Self {
        self.calendar_interval = Some(interval.to_string());
        self
    }

    /// Date histograms only.
    pub fn fixed_interval(mut self, interval: &str) -> Self {
        self.fixed_interval = Some(interval.to_string());
        self
    }

    /// Date histograms only.
    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    /// Date histograms only.
    pub fn time_zone(mut self, time_zone: &str) -> Self {
        self.time_zone = Some(time_zone.to_string());
        self
    }

    pub fn source(&self) -> Value {
        let mut body = Map::new();
        if let Some(field) = &self.field {
            body.insert("field".into(), json!(field));
        }
        if let Some(script) = &self.script {
            body.insert("script".into(), script.clone());
        }
        if let Some(value_type) = &self.value_type {
            body.insert("value_type".into(), json!(value_type));
        }
        if let Some(missing_bucket) = self.missing_bucket {
            body.insert("missing_bucket".into(), json!(missing_bucket));
        }
        if let Some(order) = &self.order {
            body.insert("order".into(), json!(order));
        }
        let kind = match &self.kind {
            CompositeSourceKind::Terms => "terms",
            CompositeSourceKind::Histogram { interval } => {
                body.insert("interval".into(), json!(interval));
                "histogram"
            }
            CompositeSourceKind::DateHistogram => {
                let optional = [
                    ("calendar_interval", &self.calendar_interval),
                    ("fixed_interval", &self.fixed_interval),
                    ("format", &self.format),
                    ("time_zone", &self.time_zone),
                ];
                for (key, value) in optional {
                    if let Some(value) = value {
                        body.insert(key.into(), json!(value));
                    }
                }
                "date_histogram"
            }
        };
        wrap(&self.name, wrap(kind, Value::Object(body)))
    }
}

/// Paginates over every combination of its value sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeAggregation {
    sources: Vec<CompositeValuesSource>,
    size: Option<i64>,
    after: Option<Map<String, Value>>,
    sub_aggs: BTreeMap<String, Value>,
    meta: Option<Value>,
}

impl CompositeAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = CompositeValuesSource>,
    {
        self.sources.extend(sources);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Resume after the `after_key` of a previous page.
    pub fn after_key(mut self, after: Map<String, Value>) -> Self {
        self.after = Some(after);
        self
    }

    pub fn sub_aggregation(mut self, name: &str, aggregation: impl Aggregation) -> Self {
        self.sub_aggs.insert(name.to_string(), aggregation.source());
        self
    }

    pub fn meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl Aggregation for CompositeAggregation {
    fn source(&self) -> Value {
        let mut body = Map::new();
        let sources: Vec<Value> = self.sources.iter().map(CompositeValuesSource::source).collect();
        body.insert("sources".into(), Value::Array(sources));
        if let Some(size) = self.size {
            body.insert("size".into(), json!(size));
        }
        if let Some(after) = &self.after {
            body.insert("after".into(), Value::Object(after.clone()));
        }
        aggregation_body("composite", body, &self.sub_aggs, &self.meta)
    }
}

/// An aggregation given as literal JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAggregation(pub Value);

impl Aggregation for RawAggregation {
    fn source(&self) -> Value {
        self.0.clone()
    }
}

/// Sort on a field, with optional handling of missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct SortInfo {
    field: String,
    ascending: bool,
    missing: Option<Value>,
    unmapped_type: Option<String>,
    mode: Option<String>,
}

impl SortInfo {
    pub fn new(field: &str, ascending: bool) -> Self {
        Self {
            field: field.to_string(),
            ascending,
            missing: None,
            unmapped_type: None,
            mode: None,
        }
    }

    /// `_first`, `_last` or a literal value.
    pub fn missing(mut self, missing: impl Into<Value>) -> Self {
        self.missing = Some(missing.into());
        self
    }

    pub fn unmapped_type(mut self, unmapped_type: &str) -> Self {
        self.unmapped_type = Some(unmapped_type.to_string());
        self
    }

    /// `min`, `max`, `sum`, `avg` or `median` for multi-valued fields.
    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    pub fn source(&self) -> Value {
        let mut body = Map::new();
        body.insert("order".into(), json!(if self.ascending { "asc" } else { "desc" }));
        if let Some(missing) = &self.missing {
            body.insert("missing".into(), missing.clone());
        }
        if let Some(unmapped) = &self.unmapped_type {
            body.insert("unmapped_type".into(), json!(unmapped));
        }
        if let Some(mode) = &self.mode {
            body.insert("mode".into(), json!(mode));
        }
        wrap(&self.field, Value::Object(body))
    }
}

/// The body of a search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSource {
    query: Option<Value>,
    post_filter: Option<Value>,
    from: Option<i64>,
    size: Option<i64>,
    sorts: Vec<Value>,
    track_scores: Option<bool>,
    track_total_hits: Option<Value>,
    aggregations: BTreeMap<String, Value>,
    highlight: Option<Value>,
    fetch_source: Option<Value>,
    stored_fields: Option<Vec<String>>,
    docvalue_fields: Vec<String>,
    min_score: Option<f64>,
    explain: Option<bool>,
    version: Option<bool>,
    seq_no_primary_term: Option<bool>,
    timeout: Option<String>,
    terminate_after: Option<i64>,
    search_after: Vec<Value>,
    profile: Option<bool>,
    collapse: Option<Value>,
}

impl SearchSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Query) -> Self {
        self.query = Some(query.source());
        self
    }

    pub fn post_filter(mut self, filter: impl Query) -> Self {
        self.post_filter = Some(filter.source());
        self
    }

    pub fn from(mut self, from: i64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, field: &str, ascending: bool) -> Self {
        self.sorts.push(SortInfo::new(field, ascending).source());
        self
    }

    pub fn sort_by(mut self, sort: SortInfo) -> Self {
        self.sorts.push(sort.source());
        self
    }

    /// Sort in index order, the cheapest order for full scans.
    pub fn sort_by_doc(mut self) -> Self {
        self.sorts.push(json!("_doc"));
        self
    }

    pub fn has_sort(&self) -> bool {
        !self.sorts.is_empty()
    }

    pub fn track_scores(mut self, track: bool) -> Self {
        self.track_scores = Some(track);
        self
    }

    /// `true`, `false` or an integer threshold.
    pub fn track_total_hits(mut self, track: impl Into<Value>) -> Self {
        self.track_total_hits = Some(track.into());
        self
    }

    pub fn aggregation(mut self, name: &str, aggregation: impl Aggregation) -> Self {
        self.aggregations.insert(name.to_string(), aggregation.source());
        self
    }

    pub fn highlight(mut self, highlight: Value) -> Self {
        self.highlight = Some(highlight);
        self
    }

    /// Enable or disable returning `_source`.
    pub fn fetch_source(mut self, fetch: bool) -> Self {
        self.fetch_source = Some(json!(fetch));
        self
    }

    pub fn fetch_source_includes_excludes(mut self, includes: &[&str], excludes: &[&str]) -> Self {
        self.fetch_source = Some(json!({"includes": includes, "excludes": excludes}));
        self
    }

    pub fn stored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stored_fields
            .get_or_insert_with(Vec::new)
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Return no stored fields at all.
    pub fn no_stored_fields(mut self) -> Self {
        self.stored_fields = Some(vec!["_none_".to_string()]);
        self
    }

    pub fn docvalue_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.docvalue_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    pub fn explain(mut self, explain: bool) -> Self {
        self.explain = Some(explain);
        self
    }

    pub fn version(mut self, version: bool) -> Self {
        self.version = Some(version);
        self
    }

    pub fn seq_no_primary_term(mut self, enabled: bool) -> Self {
        self.seq_no_primary_term = Some(enabled);
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn terminate_after(mut self, count: i64) -> Self {
        self.terminate_after = Some(count);
        self
    }

    /// Sort values of the last hit of the previous page.
    pub fn search_after<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.search_after = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn profile(mut self, profile: bool) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Collapse hits on a keyword or numeric field.
    pub fn collapse(mut self, field: &str) -> Self {
        self.collapse = Some(json!({ "field": field }));
        self
    }

    /// Render the body as JSON.
    pub fn source(&self) -> Value {
        let mut body = Map::new();
        let optional = [
            ("query", self.query.clone()),
            ("post_filter", self.post_filter.clone()),
            ("from", self.from.map(Value::from)),
            ("size", self.size.map(Value::from)),
            ("track_scores", self.track_scores.map(Value::from)),
            ("track_total_hits", self.track_total_hits.clone()),
            ("highlight", self.highlight.clone()),
            ("_source", self.fetch_source.clone()),
            ("stored_fields", self.stored_fields.as_ref().map(|f| json!(f))),
            ("min_score", self.min_score.map(Value::from)),
            ("explain", self.explain.map(Value::from)),
            ("version", self.version.map(Value::from)),
            ("seq_no_primary_term", self.seq_no_primary_term.map(Value::from)),
            ("timeout", self.timeout.as_ref().map(|t| json!(t))),
            ("terminate_after", self.terminate_after.map(Value::from)),
            ("profile", self.profile.map(Value::from)),
            ("collapse", self.collapse.clone()),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                body.insert(key.into(), value);
            }
        }
        if !self.sorts.is_empty() {
            body.insert("sort".into(), Value::Array(self.sorts.clone()));
        }
        if !self.docvalue_fields.is_empty() {
            body.insert("docvalue_fields".into(), json!(self.docvalue_fields));
        }
        if !self.search_after.is_empty() {
            body.insert("search_after".into(), Value::Array(self.search_after.clone()));
        }
        if !self.aggregations.is_empty() {
            let aggs: Map<String, Value> = self
                .aggregations
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            body.insert("aggregations".into(), Value::Object(aggs));
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_and_terms() {
        assert_eq!(
            TermQuery::new("user", "kimchy").source(),
            json!({"term":{"user":"kimchy"}})
        );
        assert_eq!(
            TermQuery::new("age", 30).boost(2.0).source(),
            json!({"term":{"age":{"value":30,"boost":2.0}}})
        );
        assert_eq!(
            TermsQuery::new("tags", ["a", "b"]).source(),
            json!({"terms":{"tags":["a","b"]}})
        );
    }

    #[test]
    fn match_and_range() {
        assert_eq!(
            MatchQuery::new("message", "this is a test").operator("and").source(),
            json!({"match":{"message":{"query":"this is a test","operator":"and"}}})
        );
        assert_eq!(
            RangeQuery::new("age").gte(10).lt(20).source(),
            json!({"range":{"age":{"gte":10,"lt":20}}})
        );
        assert_eq!(
            RangeQuery::new("date").gte("now-1d/d").format("yyyy-MM-dd").time_zone("+01:00").source(),
            json!({"range":{"date":{"gte":"now-1d/d","format":"yyyy-MM-dd","time_zone":"+01:00"}}})
        );
    }

    #[test]
    fn bool_single_and_multiple_clauses() {
        let query = BoolQuery::new()
            .must(TermQuery::new("user", "kimchy"))
            .filter(TermQuery::new("tag", "tech"))
            .filter(RangeQuery::new("age").gte(10))
            .should(MatchAllQuery::new())
            .minimum_should_match("1")
            .boost(1.5);
        assert_eq!(
            query.source(),
            json!({"bool":{
                "must":{"term":{"user":"kimchy"}},
                "filter":[{"term":{"tag":"tech"}},{"range":{"age":{"gte":10}}}],
                "should":{"match_all":{}},
                "minimum_should_match":"1",
                "boost":1.5
            }})
        );
    }

    #[test]
    fn raw_query_and_references() {
        let raw = RawQuery(json!({"exists":{"field":"user"}}));
        assert_eq!((&raw).source(), json!({"exists":{"field":"user"}}));
        let boxed: Box<dyn Query> = Box::new(MatchAllQuery::new().boost(1.2));
        assert_eq!(boxed.source(), json!({"match_all":{"boost":1.2}}));
    }

    #[test]
    fn terms_aggregation_with_sub_aggregation() {
        let agg = TermsAggregation::new()
            .field("genre")
            .size(10)
            .min_doc_count(1)
            .order("_count", false)
            .sub_aggregation("top", RawAggregation(json!({"max":{"field":"rating"}})))
            .meta(json!({"k":"v"}));
        assert_eq!(
            agg.source(),
            json!({
                "terms":{"field":"genre","size":10,"min_doc_count":1,"order":{"_count":"desc"}},
                "aggregations":{"top":{"max":{"field":"rating"}}},
                "meta":{"k":"v"}
            })
        );
    }

    #[test]
    fn composite_aggregation_sources() {
        let mut after = Map::new();
        after.insert("product".into(), json!("abc"));
        let agg = CompositeAggregation::new()
            .sources([
                CompositeValuesSource::terms("product").field("product").missing_bucket(true).asc(),
                CompositeValuesSource::histogram("price", 5.0).field("price"),
                CompositeValuesSource::date_histogram("day")
                    .field("timestamp")
                    .calendar_interval("1d")
                    .format("yyyy-MM-dd")
                    .desc(),
            ])
            .size(2)
            .after_key(after);
        assert_eq!(
            agg.source(),
            json!({"composite":{
                "sources":[
                    {"product":{"terms":{"field":"product","missing_bucket":true,"order":"asc"}}},
                    {"price":{"histogram":{"field":"price","interval":5.0}}},
                    {"day":{"date_histogram":{"field":"timestamp","order":"desc","calendar_interval":"1d","format":"yyyy-MM-dd"}}}
                ],
                "size":2,
                "after":{"product":"abc"}
            }})
        );
    }

    #[test]
    fn terms_source_ignores_date_only_settings() {
        let source = CompositeValuesSource::terms("t").field("f").time_zone("UTC").source();
        assert_eq!(source, json!({"t":{"terms":{"field":"f"}}}));
    }

    #[test]
    fn search_source_renders_every_part() {
        let source = SearchSource::new()
            .query(TermQuery::new("user", "kimchy"))
            .post_filter(TermQuery::new("tag", "go"))
            .from(10)
            .size(20)
            .sort("created", false)
            .sort_by(SortInfo::new("rank", true).missing("_last").unmapped_type("long"))
            .track_total_hits(true)
            .aggregation("genres", TermsAggregation::new().field("genre"))
            .fetch_source_includes_excludes(&["a"], &["b"])
            .docvalue_fields(["created"])
            .min_score(0.5)
            .explain(true)
            .version(true)
            .timeout("1s")
            .terminate_after(100)
            .search_after([json!(1), json!("x")])
            .collapse("user");
        assert!(source.has_sort());
        let body = source.source();
        assert_eq!(body["query"], json!({"term":{"user":"kimchy"}}));
        assert_eq!(body["post_filter"], json!({"term":{"tag":"go"}}));
        assert_eq!(body["from"], 10);
        assert_eq!(body["size"], 20);
        assert_eq!(
            body["sort"],
            json!([{"created":{"order":"desc"}},{"rank":{"order":"asc","missing":"_last","unmapped_type":"long"}}])
        );
        assert_eq!(body["track_total_hits"], true);
        assert_eq!(body["aggregations"]["genres"], json!({"terms":{"field":"genre"}}));
        assert_eq!(body["_source"], json!({"includes":["a"],"excludes":["b"]}));
        assert_eq!(body["docvalue_fields"], json!(["created"]));
        assert_eq!(body["min_score"], 0.5);
        assert_eq!(body["terminate_after"], 100);
        assert_eq!(body["search_after"], json!([1, "x"]));
        assert_eq!(body["collapse"], json!({"field":"user"}));
    }

    #[test]
    fn empty_search_source_is_empty_object() {
        let source = SearchSource::new();
        assert!(!source.has_sort());
        assert_eq!(source.source(), json!({}));
        assert_eq!(SearchSource::new().no_stored_fields().source(), json!({"stored_fields":["_none_"]}));
        assert_eq!(SearchSource::new().sort_by_doc().source(), json!({"sort":["_doc"]}));
    }
}
