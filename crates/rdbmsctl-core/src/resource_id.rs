//! Resource identifiers
//!
//! `/subscriptions/{sub}/resourceGroups/{group}/providers/{namespace}/{type}/{name}[/{child_type}/{child_name}]`

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::settings::IdPart;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceIdError {
    #[error("'{0}' is not a valid resource ID")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceId {
    pub subscription: String,
    pub resource_group: String,
    pub namespace: String,
    pub resource_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_type_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_name_1: Option<String>,
}

impl ResourceId {
    pub fn new(
        subscription: impl Into<String>,
        resource_group: impl Into<String>,
        namespace: impl Into<String>,
        resource_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subscription: subscription.into(),
            resource_group: resource_group.into(),
            namespace: namespace.into(),
            resource_type: resource_type.into(),
            name: name.into(),
            child_type_1: None,
            child_name_1: None,
        }
    }

    #[must_use]
    pub fn with_child(
        mut self,
        child_type: impl Into<String>,
        child_name: impl Into<String>,
    ) -> Self {
        self.child_type_1 = Some(child_type.into());
        self.child_name_1 = Some(child_name.into());
        self
    }

    pub fn parse(id: &str) -> Result<Self, ResourceIdError> {
        let invalid = || ResourceIdError::Invalid(id.to_string());

        let trimmed = id.trim().trim_end_matches('/');
        let rest = trimmed.strip_prefix('/').ok_or_else(invalid)?;
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid());
        }

        let (head, child) = match segments.len() {
            8 => (&segments[..], None),
            10 => (&segments[..8], Some((segments[8], segments[9]))),
            _ => return Err(invalid()),
        };

        let keyword = |index: usize, expected: &str| head[index].eq_ignore_ascii_case(expected);
        if !(keyword(0, "subscriptions") && keyword(2, "resourceGroups") && keyword(4, "providers"))
        {
            return Err(invalid());
        }

        let mut resource = ResourceId::new(head[1], head[3], head[5], head[6], head[7]);
        if let Some((child_type, child_name)) = child {
            resource = resource.with_child(child_type, child_name);
        }
        Ok(resource)
    }

    pub fn is_valid(id: &str) -> bool {
        Self::parse(id).is_ok()
    }

    /// The component an argument marked with `part` should receive
    pub fn part(&self, part: IdPart) -> Option<&str> {
        match part {
            IdPart::ResourceGroup => Some(&self.resource_group),
            IdPart::Name => Some(&self.name),
            IdPart::ChildName1 => self.child_name_1.as_deref(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/{}/{}/{}",
            self.subscription, self.resource_group, self.namespace, self.resource_type, self.name
        )?;
        if let (Some(child_type), Some(child_name)) = (&self.child_type_1, &self.child_name_1) {
            write!(f, "/{}/{}", child_type, child_name)?;
        }
        Ok(())
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
