// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Composite key, default source name.

use restgate::{Entity, EntitySchema};

#[derive(Entity)]
pub struct StockItem {
    #[id]
    pub categoryid: i32,

    #[id]
    pub pieceid: i32,

    #[field(rename = "categoryName")]
    pub category_name: String,
}

fn main() {
    assert_eq!(StockItem::SOURCE, "stock_item");

    let metadata = StockItem::entity_metadata().unwrap();
    assert_eq!(metadata.primary_key(), ["categoryid", "pieceid"]);
    assert_eq!(metadata.backing_name_of("categoryName"), Some("category_name"));
}
