// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Minimal entity with a generated key.

use restgate::{Entity, EntitySchema};

#[derive(Debug, Clone, Entity)]
#[entity(source = "books", name = "Book")]
pub struct Book {
    #[id]
    #[auto]
    pub id: i32,

    pub title: String,

    pub publisher_id: i32,
}

fn main() {
    assert_eq!(Book::ENTITY, "Book");
    assert_eq!(Book::SOURCE, "books");

    let metadata = Book::entity_metadata().unwrap();
    assert_eq!(metadata.columns().len(), 3);
    assert!(metadata.has_generated_key());
}
