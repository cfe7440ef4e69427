//! HTML report builders
//!
//! Every builder returns a [`Node`] tree for one document; writing is left
//! to [`crate::output`].

mod diff;
mod errors;

use crate::classify::{Breakdown, Record, ReportKind, ReportSpec};
use crate::diffcat::Category;
use crate::html::{el, encode_uri_component, Element, Node};

pub use diff::{diff_report, hex_diff, marked_tokens};
pub use errors::{disallowed_report, error_table_report, nsm_report, placement_report};

const STYLE: &str = r#"
body { margin: 3rem; }
.cloud { display: flex; flex-wrap: wrap; gap: 4px; }
.cloud a { background: #eee; border: 1px solid #ccc; padding: 2px 4px; border-radius: 4px; text-decoration: none; }
.cloud a:hover { cursor: pointer; background: #cff; }
table { border-collapse: collapse; border: 2px solid #888; }
table a { text-decoration: none; color: #000; }
table a:hover { text-decoration: underline; cursor: pointer; }
tr.sep { border-top: 2px solid #888; }
tr:nth-child(odd) { background: #eee; }
th, td { border: 1px solid #ccc; padding: 2px 4px; text-align: center; }
.limit { display: block; max-height: 8rem; overflow-y: auto; overflow-wrap: anywhere; }
td.idx { color: #888; }
td.form { font-size: 20pt; }
td.form.nsm { padding: 4rem 2rem; overflow: hidden; }
td span { color: #d00; }
td span.emoji { color: #00f; }
td span.ignored { color: #aaa; }
td span.nfc { color: #c80; }
td span.mapped { color: #66f; }
td.hex { text-align: left; font: 10pt monospace; }
td.error { white-space: nowrap; }
"#;

const INDEX_STYLE: &str = r#"
body { margin: 3rem; }
ul { font-size: 20pt; }
li { padding: 0.5rem; }
li:hover { background: #cff; }
li code { background: #ddd; }
li a { display: block; }
li a code { background: #fcc; }
"#;

pub const INDEX_TITLE: &str = "Breakdown Reports";

/// Run-wide values shared by every report.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub label_count: usize,
    pub created: &'a str,
    pub resolver_url: &'a str,
    pub confused_url: &'a str,
}

impl ReportContext<'_> {
    /// Link a label to the resolver inspector.
    pub fn resolver_link(&self, name: &str) -> Element {
        inspector_link(self.resolver_url, name)
    }

    pub fn confused_link(&self, name: &str) -> Element {
        inspector_link(self.confused_url, name)
    }

    fn banner(&self) -> Element {
        el("p")
            .child(el("b").text(self.label_count.to_string()))
            .text(" labels \u{2014} Created ")
            .child(el("code").text(self.created))
            .text(" \u{2014} ")
            .child(el("a").attr("href", "./tally.json").text("JSON"))
    }

    fn document(&self, title: &str, style: &str, body: Vec<Node>) -> Node {
        el("html")
            .child(
                el("head")
                    .child(el("meta").attr("charset", "utf-8"))
                    .child(el("title").text(title))
                    .child(el("style").child(Node::Raw(style.to_string()))),
            )
            .child(
                el("body")
                    .child(el("h1").text(title))
                    .child(self.banner())
                    .children(body),
            )
            .into()
    }

    /// A report page with the shared header.
    pub fn page(&self, title: &str, body: Vec<Node>) -> Node {
        self.document(title, STYLE, body)
    }
}

fn inspector_link(base: &str, name: &str) -> Element {
    let encoded = encode_uri_component(name);
    el("a")
        .attr("data-name", encoded.as_str())
        .attr("href", format!("{base}#{encoded}"))
        .attr("target", "_blank")
}

/// `part` as a percentage of `whole`, two decimals.
pub fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", 100.0 * part as f64 / whole as f64)
}

/// `<tr>` with `th` cells.
pub fn header_row(names: &[&str]) -> Element {
    el("tr").children(names.iter().map(|&name| el("th").text(name)))
}

/// The `report` page for a bucket's records.
pub fn bucket_report(report: ReportSpec, records: &[Record], categories: &[Category], ctx: &ReportContext) -> Node {
    match report.kind {
        ReportKind::Disallowed => disallowed_report(records, ctx),
        ReportKind::Diff => diff_report(records.len(), categories, ctx),
        ReportKind::Mixture => {
            error_table_report("Illegal Mixtures", "Error", true, records, |name| ctx.resolver_link(name), ctx)
        }
        ReportKind::Whole => {
            error_table_report("Whole-script Confusables", "Conflict", false, records, |name| ctx.confused_link(name), ctx)
        }
        ReportKind::Placement => placement_report(records, ctx),
        ReportKind::Nsm => nsm_report(records, ctx),
    }
}

/// The index page listing every bucket.
pub fn index_page(breakdown: &Breakdown, ctx: &ReportContext) -> Node {
    let items = breakdown.buckets.iter().map(|bucket| {
        let summary = |a: Element| a.child(el("code").text(bucket.spec.title)).text(format!(" ({})", bucket.len()));
        let li = el("li");
        match bucket.spec.report {
            Some(report) => li.child(summary(el("a").attr("href", format!("{}.html", report.name)))),
            None => {
                let li = li.child(el("code").text(bucket.spec.title));
                li.text(format!(" ({})", bucket.len()))
            }
        }
    });
    let list = el("ul").id("index").children(items);
    ctx.document(INDEX_TITLE, INDEX_STYLE, vec![list.into()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, REGISTRY};
    use crate::html::render;
    use labelnorm::NormError;

    pub(crate) fn context() -> ReportContext<'static> {
        ReportContext {
            label_count: 3,
            created: "2023-04-01T00:00:00.000Z",
            resolver_url: "https://r.test/resolver.html",
            confused_url: "https://r.test/confused.html",
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), "33.33%");
        assert_eq!(percent(2, 2), "100.00%");
        assert_eq!(percent(0, 0), "0.00%");
    }

    #[test]
    fn test_inspector_link() {
        let html = render(&context().resolver_link("a b").text("a b").into());
        assert_eq!(
            html,
            "<a data-name=\"a%20b\" href=\"https://r.test/resolver.html#a%20b\" target=\"_blank\">a b</a>"
        );
    }

    #[test]
    fn test_banner() {
        let html = render(&context().banner().into());
        assert!(html.contains("<b>3</b> labels"));
        assert!(html.contains("<code>2023-04-01T00:00:00.000Z</code>"));
        assert!(html.contains("<a href=\"./tally.json\">JSON</a>"));
    }

    #[test]
    fn test_bucket_report_dispatches_on_kind() {
        let records = [Record::Failed {
            label: "\u{441}\u{43E}".to_string(),
            error: Some("Cyrillic/Latin".to_string()),
        }];
        let ctx = context();
        let whole = ReportSpec {
            name: "wholes",
            kind: ReportKind::Whole,
        };
        let html = render(&bucket_report(whole, &records, &[], &ctx));
        assert!(html.contains("<title>Whole-script Confusables (1)</title>"));
        assert!(html.contains("<th>Conflict</th>"));
        assert!(html.contains("href=\"https://r.test/confused.html#"));
    }

    #[test]
    fn test_index_lists_every_bucket() {
        let norm = |label: &str| -> Result<String, NormError> { Ok(label.to_string()) };
        let breakdown = classify(["a", "b.c"], &norm, REGISTRY).expect("classify");
        let html = render(&index_page(&breakdown, &context()));
        for spec in REGISTRY {
            assert!(html.contains(&format!("<code>{}</code>", spec.title)), "{}", spec.title);
        }
        assert!(html.contains("<a href=\"diff.html\"><code>different norm</code> (0)</a>"));
        assert!(html.contains("<li><code>not a label</code> (1)</li>"));
    }
}
