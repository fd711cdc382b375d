// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Every `#[column]` option and the inferred scalar types.

use chrono::{DateTime, NaiveDateTime, Utc};
use restgate::{Entity, EntitySchema, ScalarType};

pub struct Height(pub i64);

#[derive(Entity)]
#[entity(source = "trees", name = "Tree")]
pub struct Tree {
    #[id]
    #[auto]
    #[column(name = "treeId")]
    pub id: i64,

    #[field(rename = "Scientific Name")]
    pub species: Option<String>,

    #[column(name = "region_code", nullable)]
    pub region: String,

    #[column(default = "NOW()")]
    pub planted: DateTime<Utc>,

    pub surveyed: Option<NaiveDateTime>,

    #[column(ty = "int64")]
    pub height: Height,

    pub healthy: bool,

    pub crown_width: f64,

    #[column(default)]
    pub photo: Vec<u8>,
}

fn main() {
    let metadata = Tree::entity_metadata().unwrap();

    let types: Vec<ScalarType> = metadata.columns().iter().map(|c| c.scalar_type()).collect();
    assert_eq!(
        types,
        [
            ScalarType::Int64,
            ScalarType::String,
            ScalarType::String,
            ScalarType::DateTime,
            ScalarType::DateTime,
            ScalarType::Int64,
            ScalarType::Bool,
            ScalarType::Float64,
            ScalarType::ByteArray,
        ]
    );

    let region = metadata.column_by_backing("region_code").unwrap();
    assert!(region.is_nullable());
    assert!(metadata.column_by_backing("planted").unwrap().has_default());
    assert!(!metadata.column_by_backing("photo").unwrap().is_required());
    assert_eq!(metadata.exposed_name_of("species"), Some("Scientific Name"));
}
