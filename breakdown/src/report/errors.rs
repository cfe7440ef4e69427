use itertools::Itertools;
use labelnorm::cps::{explode_cp, hex_cp, is_mark};

use super::{header_row, percent, ReportContext};
use crate::classify::Record;
use crate::html::{el, Element, Node};

/// Group records by `key`, keeping first-seen order of the groups.
fn group_by<'a, K, F>(records: &'a [Record], key: F) -> Vec<(K, Vec<&'a Record>)>
where
    K: PartialEq,
    F: Fn(&'a Record) -> K,
{
    let mut groups: Vec<(K, Vec<&Record>)> = Vec::new();
    for record in records {
        let k = key(record);
        match groups.iter().position(|(g, _)| *g == k) {
            Some(i) => groups[i].1.push(record),
            None => groups.push((k, vec![record])),
        }
    }
    groups
}

/// Records sorted by their error detail.
fn sorted_by_error(records: &[Record]) -> Vec<&Record> {
    records.iter().sorted_by(|a, b| a.error().cmp(b.error())).collect()
}

/// The codepoint named by a `... {HEX}` detail, and the id used for its group.
fn detail_codepoint(detail: &str) -> (String, Option<u32>) {
    let hex = detail
        .rfind('{')
        .and_then(|i| detail[i + 1..].strip_suffix('}'));
    match hex {
        Some(hex) => (hex.to_string(), u32::from_str_radix(hex, 16).ok()),
        None => (detail.split_whitespace().join("_"), None),
    }
}

struct CharGroup<'a> {
    detail: &'a str,
    slug: String,
    cp: Option<u32>,
    records: Vec<&'a Record>,
}

fn hex_cell(label: &str, highlight: Option<u32>) -> Element {
    let mut cell = el("div").class("limit");
    for (i, cp) in explode_cp(label).into_iter().enumerate() {
        if i > 0 {
            cell = cell.text(" ");
        }
        cell = if Some(cp) == highlight {
            cell.child(el("span").text(hex_cp(cp)))
        } else {
            cell.text(hex_cp(cp))
        };
    }
    cell
}

/// Labels grouped by the disallowed codepoint, split into plain characters
/// and combining marks.
pub fn disallowed_report(records: &[Record], ctx: &ReportContext) -> Node {
    let mut groups: Vec<CharGroup> = group_by(records, Record::error)
        .into_iter()
        .map(|(detail, records)| {
            let (slug, cp) = detail_codepoint(detail);
            CharGroup { detail, slug, cp, records }
        })
        .collect();
    groups.sort_by(|a, b| {
        b.records
            .len()
            .cmp(&a.records.len())
            .then(a.cp.unwrap_or(u32::MAX).cmp(&b.cp.unwrap_or(u32::MAX)))
    });
    let (marks, chars): (Vec<CharGroup>, Vec<CharGroup>) =
        groups.into_iter().partition(|g| g.cp.is_some_and(is_mark));
    let cats = [("Characters", "characters", chars), ("Combining Marks", "combining_marks", marks)];

    let summary = el("ul").children(cats.iter().map(|(name, slug, groups)| {
        let total: usize = groups.iter().map(|g| g.records.len()).sum();
        el("li")
            .child(el("a").attr("href", format!("#{slug}")).text(*name))
            .text(format!(" ({} chars in {} names) \u{2014} ", groups.len(), total))
            .child(el("b").text(percent(total, records.len())))
    }));

    let mut body: Vec<Node> = vec![summary.into()];
    for (name, slug, groups) in &cats {
        body.push(el("h2").id(*slug).text(format!("{name} ({})", groups.len())).into());
        body.push(
            el("div")
                .class("cloud")
                .children(groups.iter().map(|g| {
                    el("a")
                        .attr("href", format!("#{}", g.slug))
                        .child(el("code").text(g.detail))
                        .text(format!(" ({})", g.records.len()))
                }))
                .into(),
        );
        for group in groups {
            body.push(
                el("h3")
                    .id(group.slug.as_str())
                    .child(el("code").text(group.detail))
                    .text(format!(" ({})", group.records.len()))
                    .into(),
            );
            let rows = group.records.iter().enumerate().map(|(i, record)| {
                let label = record.label();
                el("tr")
                    .child(el("td").text((i + 1).to_string()))
                    .child(el("td").class("form").child(ctx.resolver_link(label).class("limit").text(label)))
                    .child(el("td").class("hex").child(hex_cell(label, group.cp)))
            });
            body.push(el("table").child(header_row(&["#", "Label", "Hex"])).children(rows).into());
        }
    }
    ctx.page(&format!("Disallowed Characters ({})", records.len()), body)
}

/// A table of labels sorted by error detail, with a separator row class at
/// each change of detail.
pub fn error_table_report<F>(
    title: &str,
    column: &str,
    nowrap: bool,
    records: &[Record],
    link: F,
    ctx: &ReportContext,
) -> Node
where
    F: Fn(&str) -> Element,
{
    let sorted = sorted_by_error(records);
    let rows = sorted.iter().enumerate().map(|(i, record)| {
        let row = el("tr");
        let row = if i == 0 || sorted[i - 1].error() != record.error() {
            row.class("sep")
        } else {
            row
        };
        let detail = el("td");
        let detail = if nowrap { detail.class("error") } else { detail };
        row.child(el("td").class("idx").text((i + 1).to_string()))
            .child(el("td").class("form").child(link(record.label()).text(record.label())))
            .child(detail.text(record.error()))
    });
    let table = el("table").child(header_row(&["#", "Label", column])).children(rows);
    ctx.page(&format!("{title} ({})", records.len()), vec![table.into()])
}

/// Labels grouped by the placement rule they break.
pub fn placement_report(records: &[Record], ctx: &ReportContext) -> Node {
    let mut groups = group_by(records, |r| r.error().split(':').next().unwrap_or_default());
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
    let slug = |rule: &str| rule.split_whitespace().join("_");

    let summary = el("ul").children(groups.iter().map(|(rule, records)| {
        el("li").child(
            el("a")
                .attr("href", format!("#{}", slug(*rule)))
                .text(format!("{rule} ({})", records.len())),
        )
    }));
    let mut body: Vec<Node> = vec![summary.into()];
    for (rule, records) in &groups {
        body.push(el("h2").id(slug(*rule)).text(format!("{rule} ({})", records.len())).into());
        let rows = records.iter().enumerate().map(|(i, record)| {
            el("tr")
                .child(el("td").text((i + 1).to_string()))
                .child(el("td").class("form").child(ctx.resolver_link(record.label()).text(record.label())))
        });
        body.push(el("table").child(header_row(&["#", "Label"])).children(rows).into());
    }
    ctx.page(&format!("Illegal Placement ({})", records.len()), body)
}

/// Non-spacing mark failures, with soft hyphens between the characters of
/// each label so long mark stacks can wrap.
pub fn nsm_report(records: &[Record], ctx: &ReportContext) -> Node {
    let group = |r: &Record| r.error().split(' ').next().unwrap_or_default().to_string();
    let sorted = sorted_by_error(records);
    let rows = sorted.iter().enumerate().map(|(i, record)| {
        let row = el("tr");
        let row = if i == 0 || group(sorted[i - 1]) != group(*record) {
            row.class("sep")
        } else {
            row
        };
        let spread = record.label().chars().map(String::from).join("\u{AD}");
        row.child(el("td").class("idx").text((i + 1).to_string()))
            .child(el("td").class("form nsm").child(ctx.resolver_link(record.label()).text(spread)))
            .child(el("td").class("error").text(record.error()))
    });
    let table = el("table").child(header_row(&["#", "Label", "Error"])).children(rows);
    ctx.page(&format!("Non-spacing Marks ({})", records.len()), vec![table.into()])
}
