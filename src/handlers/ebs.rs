//! Handlers for the Elastic Block Store calls.

use super::TagSetCollector;
use crate::domain::{Attachment, AttachmentStatus, Snapshot, SnapshotStatus, Volume, VolumeStatus};
use crate::xml::{
    non_empty, parse_bool, parse_date, parse_number, required, ElementPath, SaxHandler, XmlError,
};

fn attachment_field(attachment: &mut Attachment, name: &str, text: &str) -> Result<(), XmlError> {
    match name {
        "volumeId" => attachment.volume_id = text.to_string(),
        "instanceId" => attachment.instance_id = non_empty(text),
        "device" => attachment.device = non_empty(text),
        "status" => attachment.status = AttachmentStatus::from_wire(text),
        "attachTime" if !text.is_empty() => {
            attachment.attach_time = Some(parse_date("attachTime", text)?)
        }
        "deleteOnTermination" if !text.is_empty() => {
            attachment.delete_on_termination = Some(parse_bool("deleteOnTermination", text)?)
        }
        _ => {}
    }
    Ok(())
}

/// CreateVolume (one volume at the root) and DescribeVolumes
/// (`<volumeSet>`).
#[derive(Debug)]
pub struct VolumeHandler {
    region: String,
    volumes: Vec<Volume>,
    current: Volume,
    attachment: Attachment,
    tags: TagSetCollector,
}

impl VolumeHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            current: Volume {
                region: region.clone(),
                ..Default::default()
            },
            attachment: Attachment {
                region: region.clone(),
                ..Default::default()
            },
            region,
            volumes: Vec::new(),
            tags: TagSetCollector::default(),
        }
    }

    /// Single-volume variant for CreateVolume.
    pub fn create_volume(region: impl Into<String>) -> CreateVolumeHandler {
        CreateVolumeHandler(Self::new(region))
    }

    fn volume_field(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        let volume = &mut self.current;
        match name {
            "volumeId" => volume.id = text.to_string(),
            "size" => volume.size = parse_number("size", text)?,
            "snapshotId" => volume.snapshot_id = non_empty(text),
            "availabilityZone" => volume.availability_zone = non_empty(text),
            "status" => volume.status = VolumeStatus::from_wire(text),
            "createTime" if !text.is_empty() => {
                volume.create_time = Some(parse_date("createTime", text)?)
            }
            "volumeType" => volume.volume_type = non_empty(text),
            "iops" if !text.is_empty() => volume.iops = Some(parse_number("iops", text)?),
            _ => {}
        }
        Ok(())
    }
}

impl SaxHandler for VolumeHandler {
    type Output = Vec<Volume>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if self.tags.end_element(path, text) {
            return Ok(());
        }
        if path.contains("attachmentSet") {
            if path.ends_with(&["attachmentSet", "item"]) {
                let attachment = std::mem::replace(
                    &mut self.attachment,
                    Attachment {
                        region: self.region.clone(),
                        ..Default::default()
                    },
                );
                self.current.attachments.push(attachment);
            } else {
                attachment_field(&mut self.attachment, path.current(), text)?;
            }
            return Ok(());
        }
        if path.ends_with(&["volumeSet", "item"]) {
            let mut volume = std::mem::replace(
                &mut self.current,
                Volume {
                    region: self.region.clone(),
                    ..Default::default()
                },
            );
            volume.tags = self.tags.take();
            self.volumes.push(volume);
            return Ok(());
        }
        let volume_level = (path.parent() == "item" && path.ancestor(2) == "volumeSet")
            || path.depth() == 2;
        if volume_level {
            self.volume_field(path.current(), text)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Volume>, XmlError> {
        Ok(self.volumes)
    }
}

#[derive(Debug)]
pub struct CreateVolumeHandler(VolumeHandler);

impl SaxHandler for CreateVolumeHandler {
    type Output = Volume;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        self.0.end_element(path, text)
    }

    fn finish(self) -> Result<Volume, XmlError> {
        let mut volume = self.0.current;
        if volume.id.is_empty() {
            return Err(XmlError::MissingElement("volumeId".to_string()));
        }
        let mut tags = self.0.tags;
        volume.tags = tags.take();
        Ok(volume)
    }
}

/// AttachVolume / DetachVolume.
#[derive(Debug)]
pub struct AttachmentHandler {
    attachment: Attachment,
}

impl AttachmentHandler {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            attachment: Attachment {
                region: region.into(),
                ..Default::default()
            },
        }
    }
}

impl SaxHandler for AttachmentHandler {
    type Output = Attachment;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.depth() == 2 {
            attachment_field(&mut self.attachment, path.current(), text)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Attachment, XmlError> {
        if self.attachment.volume_id.is_empty() {
            return Err(XmlError::MissingElement("volumeId".to_string()));
        }
        Ok(self.attachment)
    }
}

/// CreateSnapshot (root) and DescribeSnapshots (`<snapshotSet>`).
#[derive(Debug)]
pub struct SnapshotHandler {
    region: String,
    snapshots: Vec<Snapshot>,
    current: Snapshot,
    tags: TagSetCollector,
}

impl SnapshotHandler {
    pub fn new(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            current: Snapshot {
                region: region.clone(),
                ..Default::default()
            },
            region,
            snapshots: Vec::new(),
            tags: TagSetCollector::default(),
        }
    }

    fn snapshot_field(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        let snapshot = &mut self.current;
        match name {
            "snapshotId" => snapshot.id = text.to_string(),
            "volumeId" => snapshot.volume_id = non_empty(text),
            "status" => snapshot.status = SnapshotStatus::from_wire(text),
            "startTime" if !text.is_empty() => {
                snapshot.start_time = Some(parse_date("startTime", text)?)
            }
            "progress" => snapshot.progress = non_empty(text),
            "ownerId" => snapshot.owner_id = non_empty(text),
            "ownerAlias" => snapshot.owner_alias = non_empty(text),
            "volumeSize" if !text.is_empty() => {
                snapshot.volume_size = parse_number("volumeSize", text)?
            }
            "description" => snapshot.description = non_empty(text),
            _ => {}
        }
        Ok(())
    }

    /// The single snapshot of a CreateSnapshot response.
    pub fn single(region: impl Into<String>) -> SingleSnapshotHandler {
        SingleSnapshotHandler(Self::new(region))
    }
}

impl SaxHandler for SnapshotHandler {
    type Output = Vec<Snapshot>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if self.tags.end_element(path, text) {
            return Ok(());
        }
        if path.ends_with(&["snapshotSet", "item"]) {
            let mut snapshot = std::mem::replace(
                &mut self.current,
                Snapshot {
                    region: self.region.clone(),
                    ..Default::default()
                },
            );
            snapshot.tags = self.tags.take();
            self.snapshots.push(snapshot);
            return Ok(());
        }
        if (path.parent() == "item" && path.ancestor(2) == "snapshotSet") || path.depth() == 2 {
            self.snapshot_field(path.current(), text)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Snapshot>, XmlError> {
        Ok(self.snapshots)
    }
}

#[derive(Debug)]
pub struct SingleSnapshotHandler(SnapshotHandler);

impl SaxHandler for SingleSnapshotHandler {
    type Output = Snapshot;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        self.0.end_element(path, text)
    }

    fn finish(self) -> Result<Snapshot, XmlError> {
        let snapshot = self.0.current;
        required(non_empty(&snapshot.id), "snapshotId")?;
        Ok(snapshot)
    }
}
