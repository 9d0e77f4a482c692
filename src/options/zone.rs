use super::{indexed_params, FormParams};

#[derive(Debug, Clone, Default)]
pub struct DescribeAvailabilityZonesOptions {
    zones: Vec<String>,
}

impl DescribeAvailabilityZonesOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zones<I: IntoIterator<Item = S>, S: Into<String>>(mut self, zones: I) -> Self {
        self.zones.extend(zones.into_iter().map(Into::into));
        self
    }
}

impl FormParams for DescribeAvailabilityZonesOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        indexed_params("ZoneName", &self.zones)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DescribeRegionsOptions {
    regions: Vec<String>,
}

impl DescribeRegionsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions<I: IntoIterator<Item = S>, S: Into<String>>(mut self, regions: I) -> Self {
        self.regions.extend(regions.into_iter().map(Into::into));
        self
    }
}

impl FormParams for DescribeRegionsOptions {
    fn form_params(&self) -> Vec<(String, String)> {
        indexed_params("RegionName", &self.regions)
    }
}
