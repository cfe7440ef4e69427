//! Corpus statistics
//!
//! Small one-pass counts used when deciding how hyphens, hyphen look-alikes
//! and underscores should be treated, plus a probe that reports whether
//! names survive normalization unchanged.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use labelnorm::cps::{explode_cp, hex_cp, safe_str};
use labelnorm::tables::{HYPHEN, UNDERSCORE};
use labelnorm::Normalize;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Hyphen look-alikes tracked by [`hyphen_likes`].
pub const HYPHEN_LIKES: [u32; 21] = [
    0x2D, 0x2010, 0x2011, 0x2012, 0x2013, 0x2014, 0x2015, 0x207B, 0x208B, 0x2212, 0xFE31, 0xFE32, 0xFE58, 0x23BA,
    0x23BB, 0x23BC, 0x23BD, 0x23E4, 0x23AF, 0x2027, 0x2043,
];

/// Hyphen runs in one corpus.
///
/// Serializes as a flat object: the run length counts (`"0"` for labels
/// without a hyphen) in ascending order, then the `ext` and `names-N` lists
/// in the order they were first filled.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct HyphenTally {
    pub runs: BTreeMap<usize, usize>,
    pub lists: Vec<(String, Vec<String>)>,
}

impl HyphenTally {
    pub fn count(&mut self, s: &str) {
        let cps = explode_cp(s);
        if cps.get(2) == Some(&HYPHEN) && cps.get(3) == Some(&HYPHEN) {
            self.add_to("ext", s);
        }
        let mut none = true;
        for run in cps.split(|&cp| cp != HYPHEN).map(<[u32]>::len).filter(|&n| n > 0) {
            none = false;
            *self.runs.entry(run).or_default() += 1;
            if run >= 2 {
                self.add_to(&format!("names-{run}"), s);
            }
        }
        if none {
            *self.runs.entry(0).or_default() += 1;
        }
    }

    /// The labels collected under `key`, e.g. `ext` or `names-2`.
    pub fn list(&self, key: &str) -> &[String] {
        self.lists
            .iter()
            .find(|(k, _)| k == key)
            .map_or(&[][..], |(_, names)| names.as_slice())
    }

    fn add_to(&mut self, key: &str, s: &str) {
        match self.lists.iter_mut().find(|(k, _)| k == key) {
            Some((_, names)) => names.push(s.to_string()),
            None => self.lists.push((key.to_string(), vec![s.to_string()])),
        }
    }
}

impl Serialize for HyphenTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.runs.len() + self.lists.len()))?;
        for (run, count) in &self.runs {
            map.serialize_entry(&run.to_string(), count)?;
        }
        for (key, names) in &self.lists {
            map.serialize_entry(key, names)?;
        }
        map.end()
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct HyphenCount {
    pub raw: HyphenTally,
    pub norm: HyphenTally,
}

/// Hyphen runs before and after normalization. Labels that fail to
/// normalize only count towards `raw`.
pub fn hyphen_count<N: Normalize + ?Sized>(labels: &[String], normalizer: &N) -> HyphenCount {
    let mut out = HyphenCount::default();
    for label in labels {
        if let Ok(norm) = normalizer.normalize(label) {
            out.norm.count(&norm);
        }
        out.raw.count(label);
    }
    out
}

fn hyphen_key(cp: u32) -> String {
    format!("{} {}", hex_cp(cp), safe_str(cp))
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct HyphenLikes {
    /// Labels containing any tracked character.
    pub count: usize,
    /// Labels containing each character, every tracked character listed.
    pub tally: BTreeMap<String, usize>,
    /// The same after normalization, only characters that survive.
    pub after: BTreeMap<String, usize>,
}

pub fn hyphen_likes<N: Normalize + ?Sized>(labels: &[String], normalizer: &N) -> HyphenLikes {
    let mut out = HyphenLikes {
        tally: HYPHEN_LIKES.iter().map(|&cp| (hyphen_key(cp), 0)).collect(),
        ..HyphenLikes::default()
    };
    for label in labels {
        let cps = explode_cp(label);
        let mut any = false;
        for &cp in HYPHEN_LIKES.iter().filter(|cp| cps.contains(cp)) {
            *out.tally.entry(hyphen_key(cp)).or_default() += 1;
            any = true;
        }
        if any {
            out.count += 1;
        }
        if let Ok(norm) = normalizer.normalize(label) {
            let cps = explode_cp(&norm);
            for &cp in HYPHEN_LIKES.iter().filter(|cp| cps.contains(cp)) {
                *out.after.entry(hyphen_key(cp)).or_default() += 1;
            }
        }
    }
    out
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnderscoreCount {
    /// Normalized labels keyed by the length of their leading underscore run.
    pub leading: BTreeMap<usize, Vec<String>>,
    /// Normalized labels with an underscore anywhere else.
    pub includes: Vec<String>,
}

/// Underscore usage among the labels that normalize.
pub fn underscore_count<N: Normalize + ?Sized>(labels: &[String], normalizer: &N) -> UnderscoreCount {
    let mut out = UnderscoreCount::default();
    for label in labels {
        let Ok(norm) = normalizer.normalize(label) else {
            continue;
        };
        let cps = explode_cp(label);
        let leading = cps.iter().take_while(|&&cp| cp == UNDERSCORE).count();
        if leading > 0 {
            out.leading.entry(leading).or_default().push(norm);
        } else if cps.contains(&UNDERSCORE) {
            out.includes.push(norm);
        }
    }
    out
}

/// How a name fared under normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// Normalized; `true` when the output equals the input.
    Normalized(bool),
    Failed(String),
}

/// Normalize each dot-separated label of `name`.
pub fn normalize_name<N: Normalize + ?Sized>(name: &str, normalizer: &N) -> Result<String, labelnorm::NormError> {
    let labels = name
        .split('.')
        .map(|label| normalizer.normalize(label))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(labels.join("."))
}

pub fn probe<N: Normalize + ?Sized>(name: &str, normalizer: &N) -> Probe {
    match normalize_name(name, normalizer) {
        Ok(norm) => Probe::Normalized(norm == name),
        Err(e) => Probe::Failed(e.to_string()),
    }
}

/// Write `value` as tab-indented JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Error creating {}", dir.display()))?;
    }
    let file = File::create(path).with_context(|| format!("Error creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelnorm::Normalizer;
    use pretty_assertions::assert_eq;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hyphen_runs() {
        let mut tally = HyphenTally::default();
        for s in ["abc", "a-b", "ab--cd", "a---b-c", "-"] {
            tally.count(s);
        }
        assert_eq!(tally.runs, BTreeMap::from([(0, 1), (1, 3), (2, 1), (3, 1)]));
        assert_eq!(tally.list("ext"), ["ab--cd"]);
        assert_eq!(tally.list("names-3"), ["a---b-c"]);
        assert!(tally.list("names-4").is_empty());
        let json = serde_json::to_string(&tally).expect("serialize");
        assert_eq!(
            json,
            r#"{"0":1,"1":3,"2":1,"3":1,"ext":["ab--cd"],"names-2":["ab--cd"],"names-3":["a---b-c"]}"#
        );
    }

    #[test]
    fn test_hyphen_lists_keep_first_seen_order() {
        let mut tally = HyphenTally::default();
        for s in ["a--b", "ab--cd", "x---y"] {
            tally.count(s);
        }
        let json = serde_json::to_string(&tally).expect("serialize");
        assert_eq!(
            json,
            r#"{"2":2,"3":1,"names-2":["a--b","ab--cd"],"ext":["ab--cd"],"names-3":["x---y"]}"#
        );
    }

    #[test]
    fn test_hyphen_count_norm_side() {
        let count = hyphen_count(&labels(&["a\u{2013}b", "A B"]), &Normalizer::new());
        assert_eq!(count.raw.runs, BTreeMap::from([(0, 2)]));
        assert_eq!(count.norm.runs, BTreeMap::from([(1, 1)]));
    }

    #[test]
    fn test_hyphen_likes() {
        let out = hyphen_likes(&labels(&["a\u{2013}b", "c-d", "plain"]), &Normalizer::new());
        assert_eq!(out.count, 2);
        assert_eq!(out.tally.len(), HYPHEN_LIKES.len());
        assert_eq!(out.tally["2013 \u{2013}"], 1);
        assert_eq!(out.tally["2D -"], 1);
        assert_eq!(out.after, BTreeMap::from([("2D -".to_string(), 2)]));
    }

    #[test]
    fn test_underscores() {
        let out = underscore_count(&labels(&["__a", "_B", "a_b", "x"]), &Normalizer::new());
        assert_eq!(
            out.leading,
            BTreeMap::from([(1, vec!["_b".to_string()]), (2, vec!["__a".to_string()])])
        );
        assert!(out.includes.is_empty());
    }

    #[test]
    fn test_probe() {
        let n = Normalizer::new();
        assert_eq!(probe("abc.eth", &n), Probe::Normalized(true));
        assert_eq!(probe("ABC.eth", &n), Probe::Normalized(false));
        assert_eq!(
            probe("a b.eth", &n),
            Probe::Failed("disallowed character: {20}".to_string())
        );
    }

    #[test]
    fn test_write_json_uses_tabs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out/count.json");
        write_json(&path, &BTreeMap::from([("a", 1)])).expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "{\n\t\"a\": 1\n}");
    }
}
