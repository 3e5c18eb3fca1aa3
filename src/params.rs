//! Captured path parameters.

use std::slice;

/// Splits a captured segment into `(value, format)`.
///
/// The format is whatever follows the last `.`, provided that dot is not the
/// first character and something follows it.
///
/// ```rust
/// use switchyard::split_format;
///
/// assert_eq!(split_format("1.json"), ("1", Some("json")));
/// assert_eq!(split_format("archive.tar.gz"), ("archive.tar", Some("gz")));
/// assert_eq!(split_format(".hidden"), (".hidden", None));
/// assert_eq!(split_format("trailing."), ("trailing.", None));
/// ```
pub fn split_format(raw: &str) -> (&str, Option<&str>) {
    match format_dot(raw) {
        Some(dot) => (&raw[..dot], Some(&raw[dot + 1..])),
        None => (raw, None),
    }
}

fn format_dot(raw: &str) -> Option<usize> {
    raw.rfind('.').filter(|&dot| dot > 0 && dot + 1 < raw.len())
}

/// One captured parameter.
///
/// `raw` is the path text exactly as captured; `value` and `format` are views
/// into it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Param {
    name: String,
    raw: String,
    dot: Option<usize>,
}

impl Param {
    /// A `:name` or `*name` capture: the trailing extension, if any, is split
    /// off into [`format`](Param::format).
    pub(crate) fn extracted(name: &str, raw: &str) -> Self {
        Self { name: name.to_owned(), raw: raw.to_owned(), dot: format_dot(raw) }
    }

    /// A `**name` capture: never split.
    pub(crate) fn verbatim(name: &str, raw: String) -> Self {
        Self { name: name.to_owned(), raw, dot: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The captured text with its recognized extension removed.
    pub fn value(&self) -> &str {
        match self.dot {
            Some(dot) => &self.raw[..dot],
            None => &self.raw,
        }
    }

    pub fn format(&self) -> Option<&str> {
        self.dot.map(|dot| &self.raw[dot + 1..])
    }
}

/// The parameters of a match, in the order they appear in the path.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Params(Vec<Param>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.param(name).map(Param::value)
    }

    /// The first parameter called `name`.
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.0.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> slice::Iter<'_, Param> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, param: Param) {
        self.0.push(param);
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_value_has_no_format() {
        let p = Param::extracted("id", "123");
        assert_eq!((p.raw(), p.value(), p.format()), ("123", "123", None));
    }

    #[test]
    fn extension_is_split_off() {
        let p = Param::extracted("id", "1.json");
        assert_eq!((p.raw(), p.value(), p.format()), ("1.json", "1", Some("json")));
    }

    #[test]
    fn leading_and_trailing_dots_are_not_formats() {
        assert_eq!(split_format(".env"), (".env", None));
        assert_eq!(split_format("name."), ("name.", None));
        assert_eq!(split_format("."), (".", None));
        assert_eq!(split_format(""), ("", None));
    }

    #[test]
    fn only_the_last_dot_counts() {
        let p = Param::extracted("file", "v1.2.3");
        assert_eq!((p.value(), p.format()), ("v1.2", Some("3")));
    }

    #[test]
    fn verbatim_captures_keep_their_dots() {
        let p = Param::verbatim("path", "a/b/c.txt".to_owned());
        assert_eq!((p.value(), p.format()), ("a/b/c.txt", None));
    }

    #[test]
    fn lookup_by_name_returns_first() {
        let mut params = Params::new();
        params.push(Param::extracted("id", "1"));
        params.push(Param::extracted("id", "2.xml"));

        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.iter().map(Param::raw).collect::<Vec<_>>(), ["1", "2.xml"]);
    }
}
