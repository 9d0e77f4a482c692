//! Streaming XML parsing for EC2 query API responses.
//!
//! EC2 answers every call with a namespaced XML document.  Responses are
//! consumed with a SAX-style driver on top of `quick-xml`: the driver walks
//! the event stream, keeps the stack of open element names, and hands each
//! closing element (with its trimmed text) to a [`SaxHandler`] that builds
//! the domain value incrementally.

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while turning a response body into a domain value.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The body is not well-formed XML.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document ended without an element the handler needs.
    #[error("missing element <{0}>")]
    MissingElement(String),

    /// An element's text could not be converted.
    #[error("invalid value {value:?} in <{element}>")]
    InvalidValue { element: String, value: String },
}

// ── Element path ────────────────────────────────────────────────────

/// Stack of local element names from the document root to the current
/// element.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ElementPath {
    names: Vec<String>,
}

impl ElementPath {
    /// Name of the innermost element.
    pub fn current(&self) -> &str {
        self.names.last().map(String::as_str).unwrap_or("")
    }

    /// Name of the element enclosing the current one.
    pub fn parent(&self) -> &str {
        self.ancestor(1)
    }

    /// Name `levels` above the current element; empty past the root.
    pub fn ancestor(&self, levels: usize) -> &str {
        self.names
            .len()
            .checked_sub(levels + 1)
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// True when the innermost elements are exactly `suffix`.
    pub fn ends_with(&self, suffix: &[&str]) -> bool {
        suffix.len() <= self.names.len()
            && self
                .names
                .iter()
                .rev()
                .zip(suffix.iter().rev())
                .all(|(a, b)| a == b)
    }

    /// True when any open element is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn push(&mut self, name: String) {
        self.names.push(name);
    }

    fn pop(&mut self) {
        self.names.pop();
    }
}

impl std::fmt::Display for ElementPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.names.join("/"))
    }
}

// ── Handler trait ───────────────────────────────────────────────────

/// Callback object that builds a value from a stream of XML elements.
pub trait SaxHandler {
    type Output;

    /// Called when an element opens. `path` already includes it.
    fn start_element(&mut self, _path: &ElementPath, _attrs: &[(String, String)]) {}

    /// Called when an element closes with its trimmed text content.
    /// `path` still includes the closing element.
    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError>;

    /// Produce the final value once the document is exhausted.
    fn finish(self) -> Result<Self::Output, XmlError>;
}

/// Drive `handler` over the XML document in `body`.
pub fn parse_sax<H: SaxHandler>(body: &[u8], mut handler: H) -> Result<H::Output, XmlError> {
    let mut reader = Reader::from_reader(body);
    reader.trim_text(true);

    let mut path = ElementPath::default();
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                path.push(local_name(e));
                text.clear();
                handler.start_element(&path, &attributes(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                path.push(local_name(e));
                handler.start_element(&path, &attributes(e)?);
                handler.end_element(&path, "")?;
                path.pop();
                text.clear();
            }
            Ok(Event::End(_)) => {
                if path.depth() == 0 {
                    return Err(XmlError::Malformed("unbalanced end tag".to_string()));
                }
                handler.end_element(&path, text.trim())?;
                path.pop();
                text.clear();
            }
            Ok(Event::Text(ref e)) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| XmlError::Malformed(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(XmlError::Malformed(err.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if path.depth() != 0 {
        return Err(XmlError::Malformed(format!("unclosed element {path}")));
    }
    handler.finish()
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, XmlError> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::Malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Malformed(err.to_string()))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok(attrs)
}

// ── Value helpers ───────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp as EC2 emits it, with or without
/// fractional seconds and with either `Z` or an explicit offset.
pub fn parse_date(element: &str, text: &str) -> Result<DateTime<Utc>, XmlError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Some endpoints omit the zone designator.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid(element, text))
}

/// Parse a numeric element.
pub fn parse_number<T: FromStr>(element: &str, text: &str) -> Result<T, XmlError> {
    text.parse().map_err(|_| invalid(element, text))
}

/// Parse an `xsd:boolean` element.
pub fn parse_bool(element: &str, text: &str) -> Result<bool, XmlError> {
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(element, text)),
    }
}

/// Empty text becomes `None`.
pub fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Take a required field out of a partially built value.
pub fn required<T>(value: Option<T>, element: &str) -> Result<T, XmlError> {
    value.ok_or_else(|| XmlError::MissingElement(element.to_string()))
}

fn invalid(element: &str, text: &str) -> XmlError {
    XmlError::InvalidValue {
        element: element.to_string(),
        value: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    /// Records every closing element as `path=text`.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
        attrs: Vec<(String, String)>,
    }

    impl SaxHandler for Recorder {
        type Output = (Vec<String>, Vec<(String, String)>);

        fn start_element(&mut self, _path: &ElementPath, attrs: &[(String, String)]) {
            self.attrs.extend_from_slice(attrs);
        }

        fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
            self.seen.push(format!("{path}={text}"));
            Ok(())
        }

        fn finish(self) -> Result<Self::Output, XmlError> {
            Ok((self.seen, self.attrs))
        }
    }

    #[test]
    fn test_parse_sax_tracks_local_names() {
        let xml = br#"<?xml version="1.0"?>
            <ec2:Resp xmlns:ec2="http://ec2.amazonaws.com/doc/2010-06-15/">
              <ec2:requestId>r-1</ec2:requestId>
              <set><item><id>a</id></item></set>
            </ec2:Resp>"#;
        let (seen, _) = parse_sax(xml, Recorder::default()).unwrap();
        assert_eq!(
            seen,
            vec![
                "/Resp/requestId=r-1",
                "/Resp/set/item/id=a",
                "/Resp/set/item=",
                "/Resp/set=",
                "/Resp=",
            ]
        );
    }

    #[test]
    fn test_parse_sax_unescapes_and_cdata() {
        let xml = b"<a><b>x &amp; y</b><c><![CDATA[<raw>]]></c></a>";
        let (seen, _) = parse_sax(xml, Recorder::default()).unwrap();
        assert_eq!(seen[0], "/a/b=x & y");
        assert_eq!(seen[1], "/a/c=<raw>");
    }

    #[test]
    fn test_parse_sax_empty_element_and_attrs() {
        let xml = br#"<a><b kind="x"/></a>"#;
        let (seen, attrs) = parse_sax(xml, Recorder::default()).unwrap();
        assert_eq!(seen[0], "/a/b=");
        assert_eq!(attrs, vec![("kind".to_string(), "x".to_string())]);
    }

    #[test]
    fn test_parse_sax_malformed() {
        let result = parse_sax(b"<a><b></a>", Recorder::default());
        assert!(matches!(result, Err(XmlError::Malformed(_))));
    }

    #[test]
    fn test_parse_sax_unclosed() {
        let result = parse_sax(b"<a><b>text</b>", Recorder::default());
        assert!(matches!(result, Err(XmlError::Malformed(_))));
    }

    #[test]
    fn test_element_path_queries() {
        let mut path = ElementPath::default();
        for name in ["Resp", "imagesSet", "item", "blockDeviceMapping", "item"] {
            path.push(name.to_string());
        }
        assert_eq!(path.current(), "item");
        assert_eq!(path.parent(), "blockDeviceMapping");
        assert_eq!(path.ancestor(3), "imagesSet");
        assert_eq!(path.ancestor(9), "");
        assert!(path.ends_with(&["blockDeviceMapping", "item"]));
        assert!(!path.ends_with(&["imagesSet", "item"]));
        assert!(path.contains("imagesSet"));
    }

    #[test]
    fn test_parse_date_variants() {
        let dt = parse_date("launchTime", "2009-11-08T15:54:08.897Z").unwrap();
        assert_eq!(dt.year(), 2009);
        assert_eq!(dt.nanosecond(), 897_000_000);

        let dt = parse_date("launchTime", "2010-08-10T15:55:00.000+00:00").unwrap();
        assert_eq!(dt.minute(), 55);

        let dt = parse_date("launchTime", "2010-08-10T15:55:00").unwrap();
        assert_eq!(dt.hour(), 15);

        assert!(parse_date("launchTime", "yesterday").is_err());
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(parse_number::<i64>("size", "10").unwrap(), 10);
        assert!(parse_number::<i64>("size", "ten").is_err());
        assert!(parse_bool("isPublic", "true").unwrap());
        assert!(!parse_bool("isPublic", "false").unwrap());
        assert!(parse_bool("isPublic", "yes").is_err());
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty("x").as_deref(), Some("x"));
        assert!(matches!(
            required::<String>(None, "imageId"),
            Err(XmlError::MissingElement(e)) if e == "imageId"
        ));
    }
}
