// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Model acquisition and shared model state
//!
//! This crate owns the hardest invariant in the service: there is always a
//! usable (model, vectorizer) pair to serve, and every observer can tell
//! where it came from.
//!
//! # Acquisition
//!
//! [`ModelLoader::acquire`] walks a strict fallback chain — object storage,
//! then a local artifact directory, then a synthesized placeholder trained
//! in-process — stopping at the first tier that yields a valid pair. Tier
//! failures are logged and converted into "try the next tier"; the chain as
//! a whole fails only if placeholder training itself fails.
//!
//! # State
//!
//! [`ModelState`] is the single swappable holder of the active model.
//! The (model, vectorizer, provenance) bundle lives behind one `Arc`, so a
//! swap is all-or-nothing with respect to concurrent readers: a snapshot is
//! either the old bundle, the new bundle, or empty — never a torn mix.

pub mod acquisition;
pub mod locator;
pub mod provenance;
pub mod state;

pub use acquisition::{AcquisitionError, LoaderResult, ModelLoader};
pub use locator::StorageLocator;
pub use provenance::{ModelProvenance, ModelSource};
pub use state::{ActiveModel, ModelSnapshot, ModelState, ReloadGuard};
