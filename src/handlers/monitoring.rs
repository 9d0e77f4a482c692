//! MonitorInstances / UnmonitorInstances.

use std::collections::BTreeMap;

use crate::domain::MonitoringState;
use crate::xml::{ElementPath, SaxHandler, XmlError};

/// Instance id to the monitoring state it moved to.
#[derive(Debug, Default)]
pub struct MonitoringStateHandler {
    states: BTreeMap<String, MonitoringState>,
    instance_id: Option<String>,
    state: Option<MonitoringState>,
}

impl SaxHandler for MonitoringStateHandler {
    type Output = BTreeMap<String, MonitoringState>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match (path.parent(), path.current()) {
            (_, "instanceId") => self.instance_id = Some(text.to_string()),
            ("monitoring", "state") => self.state = Some(MonitoringState::from_wire(text)),
            ("instancesSet", "item") => {
                if let (Some(id), Some(state)) = (self.instance_id.take(), self.state.take()) {
                    self.states.insert(id, state);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.states)
    }
}
