//! Response handlers: one [`SaxHandler`](crate::xml::SaxHandler) per EC2
//! response shape.
//!
//! Handlers that return resources are constructed with the region the
//! request was sent to, so every value carries it.

pub mod attribute;
pub mod ebs;
pub mod error;
pub mod image;
pub mod instance;
pub mod key_pair;
pub mod monitoring;
pub mod network;
pub mod security_group;
pub mod spot;
pub mod tag;

use std::collections::BTreeMap;

use crate::xml::{ElementPath, SaxHandler, XmlError};

/// Collects `<tagSet><item><key/><value/></item></tagSet>` nested in a
/// resource.
#[derive(Debug, Default)]
pub(crate) struct TagSetCollector {
    key: Option<String>,
    value: String,
    tags: BTreeMap<String, String>,
}

impl TagSetCollector {
    /// Consume the element if it belongs to a tag set.
    pub(crate) fn end_element(&mut self, path: &ElementPath, text: &str) -> bool {
        if !path.contains("tagSet") {
            return false;
        }
        match path.current() {
            "key" => self.key = Some(text.to_string()),
            "value" => self.value = text.to_string(),
            "item" if path.parent() == "tagSet" => {
                if let Some(key) = self.key.take() {
                    self.tags.insert(key, std::mem::take(&mut self.value));
                }
                self.value.clear();
            }
            _ => {}
        }
        true
    }

    /// Tags seen since the last call.
    pub(crate) fn take(&mut self) -> BTreeMap<String, String> {
        std::mem::take(&mut self.tags)
    }
}

/// Accepts any well-formed body; for calls whose response carries only
/// `<return>true</return>`.
#[derive(Debug, Default)]
pub struct ReturnHandler;

impl SaxHandler for ReturnHandler {
    type Output = ();

    fn end_element(&mut self, _path: &ElementPath, _text: &str) -> Result<(), XmlError> {
        Ok(())
    }

    fn finish(self) -> Result<(), XmlError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_sax;

    struct Tags(TagSetCollector);

    impl SaxHandler for Tags {
        type Output = BTreeMap<String, String>;

        fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
            self.0.end_element(path, text);
            Ok(())
        }

        fn finish(mut self) -> Result<Self::Output, XmlError> {
            Ok(self.0.take())
        }
    }

    #[test]
    fn test_tag_set_collector() {
        let xml = b"<r><tagSet>\
            <item><key>Name</key><value>web</value></item>\
            <item><key>empty</key><value/></item>\
            </tagSet></r>";
        let tags = parse_sax(xml, Tags(TagSetCollector::default())).unwrap();
        assert_eq!(tags.get("Name").map(String::as_str), Some("web"));
        assert_eq!(tags.get("empty").map(String::as_str), Some(""));
    }

    #[test]
    fn test_return_handler_accepts_body() {
        let xml = b"<DeleteVolumeResponse><requestId>1</requestId><return>true</return></DeleteVolumeResponse>";
        assert!(parse_sax(xml, ReturnHandler).is_ok());
    }
}
