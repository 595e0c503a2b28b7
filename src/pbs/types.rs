// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Inventory data model: categories, records and their attributes.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Inventory kind queried from the PBS server, in collection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Servers,
    Queues,
    Nodes,
    Jobs,
    Reservations,
    Resources,
    Schedulers,
}

impl Category {
    /// All categories in the order a run collects them
    pub const ALL: [Category; 7] = [
        Category::Servers,
        Category::Queues,
        Category::Nodes,
        Category::Jobs,
        Category::Reservations,
        Category::Resources,
        Category::Schedulers,
    ];

    /// Identifier used for the output file stem and the document `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Servers => "servers",
            Category::Queues => "queues",
            Category::Nodes => "nodes",
            Category::Jobs => "jobs",
            Category::Reservations => "reservations",
            Category::Resources => "resources",
            Category::Schedulers => "schedulers",
        }
    }

    /// Prefix in front of the record name on a status header line.
    ///
    /// `pbsnodes -a` prints the bare node name, so nodes have none.
    pub fn header_prefix(&self) -> Option<&'static str> {
        match self {
            Category::Servers => Some("Server:"),
            Category::Queues => Some("Queue:"),
            Category::Nodes => None,
            Category::Jobs => Some("Job Id:"),
            Category::Reservations => Some("Resv ID:"),
            Category::Resources => Some("Resource "),
            Category::Schedulers => Some("Sched "),
        }
    }

    /// Whether attribute lines may start in the first column.
    ///
    /// `pbs_rstat -f` does not indent attributes under `Resv ID:`.
    pub fn flush_left_attributes(&self) -> bool {
        matches!(self, Category::Reservations)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single key/value pair describing a record.
///
/// PBS reports resource-keyed attributes as `name.resource`, e.g.
/// `resources_available.mem`; those carry the sub-key in `resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
            value: value.into(),
        }
    }

    pub fn with_resource(
        name: impl Into<String>,
        resource: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resource: Some(resource.into()),
            value: value.into(),
        }
    }

    /// Build an attribute from a raw status key, splitting at the first `.`
    pub fn from_key(key: &str, value: impl Into<String>) -> Self {
        match key.split_once('.') {
            Some((name, resource)) => Self::with_resource(name, resource, value),
            None => Self::new(key, value),
        }
    }
}

/// One named entity of a category (a job, a node, a queue, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Name as reported by PBS; not guaranteed unique
    pub name: String,
    /// Attributes in the order PBS reported them
    pub attributes: Vec<Attribute>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}
