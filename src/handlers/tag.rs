//! DescribeTags.

use crate::domain::Tag;
use crate::xml::{ElementPath, SaxHandler, XmlError};

#[derive(Debug, Default)]
pub struct DescribeTagsHandler {
    tags: Vec<Tag>,
    current: Tag,
}

impl SaxHandler for DescribeTagsHandler {
    type Output = Vec<Tag>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            "resourceId" => self.current.resource_id = text.to_string(),
            "resourceType" => self.current.resource_type = text.to_string(),
            "key" => self.current.key = text.to_string(),
            "value" => self.current.value = Some(text.to_string()),
            "item" if path.parent() == "tagSet" => {
                let tag = std::mem::take(&mut self.current);
                if tag.key.is_empty() {
                    return Err(XmlError::MissingElement("key".to_string()));
                }
                self.tags.push(tag);
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Tag>, XmlError> {
        Ok(self.tags)
    }
}
