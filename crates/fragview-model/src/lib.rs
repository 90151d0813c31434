// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fragview Model - shared types and trait seams for the Fragview viewer
//!
//! This crate defines the data that flows between the parsing backend and
//! the viewer glue. The viewer never talks to a concrete parser; it works
//! against the [`ModelSource`] trait, so parser backends can be swapped
//! (or stubbed in tests) without touching the scene code.

pub mod error;
pub mod fragment;
pub mod model;
pub mod traits;
pub mod types;

pub use error::*;
pub use fragment::*;
pub use model::*;
pub use traits::*;
pub use types::*;
