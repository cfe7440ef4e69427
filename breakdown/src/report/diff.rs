use std::slice;

use labelnorm::cps::{hex_cp, hex_seq, safe_str, str_from_cps};
use labelnorm::{CodepointSet, Token};

use super::{header_row, percent, ReportContext};
use crate::diffcat::{Category, CategoryKind, DiffEntry};
use crate::html::{el, Element, Node};

/// Token-by-token hex rendering of what normalization did.
pub fn hex_diff(tokens: &[Token]) -> Vec<Node> {
    let mut out = Vec::with_capacity(tokens.len() * 2);
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push(Node::from(" "));
        }
        let shown = match token {
            Token::Emoji { input, cps } if input != cps => format!("[{} \u{2192} {}]", hex_seq(input), hex_seq(cps)),
            Token::Nfc { input, cps } => format!("{} \u{2192} {}", hex_seq(input), hex_seq(cps)),
            Token::Mapped { cp, cps } => format!("[{} \u{2192} {}]", hex_cp(*cp), hex_seq(cps)),
            Token::Ignored { cp } => format!("[{}]", hex_cp(*cp)),
            Token::Disallowed { cp } => hex_cp(*cp),
            _ => {
                out.push(Node::Text(hex_seq(token.cps())));
                continue;
            }
        };
        out.push(el("span").class(token.kind()).text(shown).into());
    }
    out
}

/// The label (or, with `norm`, its normalization) with the mapped
/// codepoints that belong to `set` wrapped in a highlight span.
pub fn marked_tokens(tokens: &[Token], set: &CodepointSet, norm: bool) -> Vec<Node> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Mapped { cp, cps } if set.contains(*cp) => {
                let shown = if norm { cps.as_slice() } else { slice::from_ref(cp) };
                el("span").text(str_from_cps(shown)).into()
            }
            _ => Node::Text(str_from_cps(if norm { token.cps() } else { token.input() })),
        })
        .collect()
}

fn form_cell(link: Element, content: Vec<Node>) -> Element {
    el("td").class("form").child(link.class("limit").children(content))
}

fn index_cell(i: usize) -> Element {
    el("td").text((i + 1).to_string())
}

fn category_table(category: &Category, ctx: &ReportContext) -> Element {
    let entries = category.entries.iter().enumerate();
    match &category.kind {
        CategoryKind::Codepoints(set) => {
            let rows = entries.map(|(i, DiffEntry { label, norm, tokens })| {
                el("tr")
                    .child(index_cell(i))
                    .child(form_cell(ctx.resolver_link(label), marked_tokens(tokens, set, false)))
                    .child(form_cell(ctx.resolver_link(norm), marked_tokens(tokens, set, true)))
                    .child(el("td").class("hex").children(hex_diff(tokens)))
            });
            el("table")
                .child(header_row(&["#", "Before", "After", "Hex Diff"]))
                .children(rows)
        }
        CategoryKind::Emoji => {
            let rows = entries.map(|(i, DiffEntry { label, tokens, .. })| {
                el("tr")
                    .child(index_cell(i))
                    .child(form_cell(ctx.resolver_link(label), vec![label.as_str().into()]))
                    .child(el("td").class("hex").children(hex_diff(tokens)))
            });
            el("table").child(header_row(&["#", "Form", "Hex Diff"])).children(rows)
        }
        CategoryKind::Other => {
            let rows = entries.map(|(i, DiffEntry { label, norm, tokens })| {
                el("tr")
                    .child(index_cell(i))
                    .child(form_cell(ctx.resolver_link(label), vec![label.as_str().into()]))
                    .child(form_cell(ctx.resolver_link(norm), vec![norm.as_str().into()]))
                    .child(el("td").class("hex").children(hex_diff(tokens)))
            });
            el("table")
                .child(header_row(&["#", "Before", "After", "Hex Diff"]))
                .children(rows)
        }
    }
}

/// The different-norm report: one section per category, largest first.
pub fn diff_report(record_count: usize, categories: &[Category], ctx: &ReportContext) -> Node {
    let total: usize = categories.iter().map(|c| c.entries.len()).sum();
    let summary = el("ul").children(categories.iter().map(|c| {
        el("li")
            .child(el("a").attr("href", format!("#{}", c.slug)).text(c.name.as_str()))
            .text(format!(" ({}) \u{2014} ", c.entries.len()))
            .child(el("b").text(percent(c.entries.len(), total)))
    }));

    let mut body: Vec<Node> = vec![summary.into()];
    for category in categories {
        body.push(
            el("h2")
                .id(category.slug.as_str())
                .text(format!("{} ({})", category.name, category.entries.len()))
                .into(),
        );
        if let Some(set) = category.set() {
            let items = set.iter().map(|cp| {
                el("li")
                    .child(el("code").text(hex_cp(cp)))
                    .text(format!(" ({})", safe_str(cp)))
            });
            body.push(el("ol").children(items).into());
        }
        body.push(category_table(category, ctx).into());
    }
    ctx.page(&format!("Different Norm ({record_count})"), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diffcat::{categorize, default_categories};
    use crate::html::{render, Node};
    use crate::report::tests::context;
    use labelnorm::Normalizer;
    use pretty_assertions::assert_eq;

    fn rendered(nodes: Vec<Node>) -> String {
        nodes.iter().map(render).collect()
    }

    #[test]
    fn test_hex_diff() {
        let tokens = vec![
            Token::Valid { cps: vec![0x61, 0x62] },
            Token::Mapped { cp: 0x2013, cps: vec![0x2D] },
            Token::Ignored { cp: 0xAD },
            Token::Nfc { input: vec![0x65, 0x301], cps: vec![0xE9] },
            Token::Emoji { input: vec![0x2764, 0xFE0F], cps: vec![0x2764] },
            Token::Emoji { input: vec![0x1F4A9], cps: vec![0x1F4A9] },
            Token::Disallowed { cp: 0x20 },
        ];
        assert_eq!(
            rendered(hex_diff(&tokens)),
            "61 62 <span class=\"mapped\">[2013 \u{2192} 2D]</span> \
             <span class=\"ignored\">[AD]</span> \
             <span class=\"nfc\">65 301 \u{2192} E9</span> \
             <span class=\"emoji\">[2764 FE0F \u{2192} 2764]</span> 1F4A9 \
             <span class=\"disallowed\">20</span>"
        );
    }

    #[test]
    fn test_marked_tokens() {
        let set = CodepointSet::from_spec("2013").expect("spec");
        let tokens = vec![
            Token::Valid { cps: vec![0x61] },
            Token::Mapped { cp: 0x2013, cps: vec![0x2D] },
            Token::Mapped { cp: 0x42, cps: vec![0x62] },
        ];
        assert_eq!(rendered(marked_tokens(&tokens, &set, false)), "a<span>\u{2013}</span>B");
        assert_eq!(rendered(marked_tokens(&tokens, &set, true)), "a<span>-</span>b");
    }

    #[test]
    fn test_diff_report_sections() {
        let cats = default_categories().expect("categories");
        let records = [("a\u{2013}b", "a-b"), ("zz", "zy")];
        let categories = categorize(records, &Normalizer::new(), &cats);
        let html = render(&diff_report(records.len(), &categories, &context()));
        assert!(html.contains("<title>Different Norm (2)</title>"));
        assert!(html.contains("<a href=\"#hyphen\">Hyphen</a> (1) \u{2014} <b>50.00%</b>"));
        assert!(html.contains("<h2 id=\"everything_else\">Everything Else (1)</h2>"));
        assert!(html.contains("<li><code>2010</code> (\u{2010})</li>"));
        assert!(html.contains("href=\"https://r.test/resolver.html#a%E2%80%93b\""));
        assert!(html.contains("<th>Hex Diff</th>"));
    }
}
