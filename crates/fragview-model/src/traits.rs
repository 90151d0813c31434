// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trait seam between the viewer and parser backends

use crate::{LoadedModel, Result};

/// A source of loaded models
///
/// The viewer loads files through this trait only. The STEP backend in
/// `fragview-parser` is the production implementation; tests stub it.
pub trait ModelSource: Send + Sync {
    /// Parse file content into a loaded model
    ///
    /// Must be all-or-nothing: on error the caller keeps its previous
    /// model untouched, so implementations never return partial data.
    fn load(&self, name: &str, content: &str) -> Result<LoadedModel>;
}
