//! Optional request parameters.
//!
//! Each builder renders to form parameters through [`FormParams`].  List
//! values use EC2's indexed convention: `ImageId.1`, `ImageId.2`, ...

pub mod ami;
pub mod ebs;
pub mod instance;
pub mod spot;
pub mod zone;

pub use ami::*;
pub use ebs::*;
pub use instance::*;
pub use spot::*;
pub use zone::*;

use crate::domain::BlockDeviceMapping;

/// Anything that contributes form parameters to a request.
pub trait FormParams {
    fn form_params(&self) -> Vec<(String, String)>;
}

/// Render `values` as `{prefix}.1`, `{prefix}.2`, ...
pub fn indexed_params<I, S>(prefix: &str, values: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (format!("{prefix}.{}", i + 1), v.as_ref().to_string()))
        .collect()
}

/// Render one block device mapping at `{prefix}.{index}`.
pub fn block_device_mapping_params(
    prefix: &str,
    index: usize,
    mapping: &BlockDeviceMapping,
) -> Vec<(String, String)> {
    let key = |suffix: &str| format!("{prefix}.{index}.{suffix}");
    let mut params = vec![(key("DeviceName"), mapping.device_name.clone())];
    if let Some(virtual_name) = &mapping.virtual_name {
        params.push((key("VirtualName"), virtual_name.clone()));
    }
    if let Some(snapshot_id) = &mapping.snapshot_id {
        params.push((key("Ebs.SnapshotId"), snapshot_id.clone()));
    }
    if let Some(size) = mapping.size_in_gib {
        params.push((key("Ebs.VolumeSize"), size.to_string()));
    }
    if let Some(delete) = mapping.delete_on_termination {
        params.push((key("Ebs.DeleteOnTermination"), delete.to_string()));
    }
    if mapping.no_device {
        params.push((key("NoDevice"), "true".to_string()));
    }
    params
}

/// `Filter.n.Name` / `Filter.n.Value.m` pairs for Describe* calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    filters: Vec<(String, Vec<String>)>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; repeated names accumulate values.
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.filters.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.filters.push((name, vec![value])),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FormParams for FilterOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (i, (name, values)) in self.filters.iter().enumerate() {
            let n = i + 1;
            params.push((format!("Filter.{n}.Name"), name.clone()));
            params.extend(indexed_params(&format!("Filter.{n}.Value"), values));
        }
        params
    }
}

#[cfg(test)]
pub(crate) fn render(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_params_start_at_one() {
        let params = indexed_params("VolumeId", ["1", "2"]);
        assert_eq!(render(&params), "VolumeId.1=1&VolumeId.2=2");
        assert!(indexed_params("VolumeId", Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_block_device_mapping_params() {
        let mapping = BlockDeviceMapping::map_ebs_snapshot("/dev/sdb", "snap-1", Some(20), false);
        assert_eq!(
            render(&block_device_mapping_params("BlockDeviceMapping", 1, &mapping)),
            "BlockDeviceMapping.1.DeviceName=/dev/sdb&BlockDeviceMapping.1.Ebs.SnapshotId=snap-1\
             &BlockDeviceMapping.1.Ebs.VolumeSize=20&BlockDeviceMapping.1.Ebs.DeleteOnTermination=false"
        );

        let unmapped = BlockDeviceMapping::unmap("/dev/sdc");
        assert_eq!(
            render(&block_device_mapping_params("BlockDeviceMapping", 2, &unmapped)),
            "BlockDeviceMapping.2.DeviceName=/dev/sdc&BlockDeviceMapping.2.NoDevice=true"
        );
    }

    #[test]
    fn test_filter_options() {
        let filters = FilterOptions::new()
            .filter("resource-type", "instance")
            .filter("key", "Name")
            .filter("resource-type", "volume");
        assert_eq!(
            render(&filters.form_params()),
            "Filter.1.Name=resource-type&Filter.1.Value.1=instance&Filter.1.Value.2=volume\
             &Filter.2.Name=key&Filter.2.Value.1=Name"
        );
        assert!(FilterOptions::new().is_empty());
    }
}
