//! Bedrock pack manifests. The behavior and resource manifests depend on each other.

use serde::Serialize;
use uuid::Uuid;

const PACK_NAME: &str = "Duplicating Table";
const PACK_DESCRIPTION: &str = "By foamwrap";
const PACK_AUTHOR: &str = "foamwrap";
const PACK_VERSION: [u8; 3] = [3, 0, 1];
const MIN_ENGINE_VERSION: [u8; 3] = [1, 20, 60];

/// Fresh identifiers for one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackIds {
    pub behavior_header: Uuid,
    pub behavior_module: Uuid,
    pub resource_header: Uuid,
    pub resource_module: Uuid,
}

impl PackIds {
    #[must_use]
    pub fn generate() -> Self {
        Self {
            behavior_header: Uuid::new_v4(),
            behavior_module: Uuid::new_v4(),
            resource_header: Uuid::new_v4(),
            resource_module: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Manifest {
    format_version: u8,
    metadata: Metadata,
    header: Header,
    modules: Vec<Module>,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
struct Metadata {
    authors: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct Header {
    name: &'static str,
    description: &'static str,
    min_engine_version: [u8; 3],
    uuid: Uuid,
    version: [u8; 3],
}

#[derive(Debug, Serialize)]
struct Module {
    #[serde(rename = "type")]
    kind: &'static str,
    uuid: Uuid,
    version: [u8; 3],
}

#[derive(Debug, Serialize)]
struct Dependency {
    uuid: Uuid,
    version: [u8; 3],
}

impl Manifest {
    fn new(kind: &'static str, header: Uuid, module: Uuid, depends_on: Uuid) -> Self {
        Self {
            format_version: 2,
            metadata: Metadata { authors: vec![PACK_AUTHOR] },
            header: Header {
                name: PACK_NAME,
                description: PACK_DESCRIPTION,
                min_engine_version: MIN_ENGINE_VERSION,
                uuid: header,
                version: PACK_VERSION,
            },
            modules: vec![Module { kind, uuid: module, version: PACK_VERSION }],
            dependencies: vec![Dependency { uuid: depends_on, version: PACK_VERSION }],
        }
    }

    /// `data` module, depending on the resource pack.
    #[must_use]
    pub fn behavior(ids: &PackIds) -> Self {
        Self::new("data", ids.behavior_header, ids.behavior_module, ids.resource_header)
    }

    /// `resources` module, depending on the behavior pack.
    #[must_use]
    pub fn resource(ids: &PackIds) -> Self {
        Self::new("resources", ids.resource_header, ids.resource_module, ids.behavior_header)
    }
}
