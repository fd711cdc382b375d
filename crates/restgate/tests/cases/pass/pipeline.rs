// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Derived entity registered in a catalog and validated without an executor.

use restgate::{Entity, SchemaCatalog, validate_insert};

#[derive(Entity)]
#[entity(source = "publishers", name = "Publisher")]
pub struct Publisher {
    #[id]
    #[auto]
    pub id: i64,

    pub name: String,
}

fn main() {
    let catalog = SchemaCatalog::builder()
        .register::<Publisher>()
        .build()
        .unwrap();
    let metadata = catalog.lookup("Publisher").unwrap();

    let row = validate_insert(metadata, br#"{"name": "Ace"}"#).unwrap();
    assert_eq!(row.len(), 1);
}
