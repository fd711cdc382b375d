// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # restgate
//!
//! One crate, all features. Re-exports:
//! - [`Entity`] derive macro from `restgate-derive-impl`
//! - All modules of `restgate-core` ([`schema`], [`insert`], [`executor`],
//!   [`error`], [`config`], [`value`])

pub use restgate_core::*;
pub use restgate_derive_impl::Entity;
