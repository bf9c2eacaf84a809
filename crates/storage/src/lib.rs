// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for the remediation pipeline: WAL + periodic snapshot,
//! with schema migration on snapshot load.

mod checkpoint;
mod migration;
mod snapshot;
mod state;
mod wal;

/// Current on-disk snapshot schema version, written as the `"v"` tag.
/// Bump when `MaterializedState`'s shape changes and register a
/// [`migration::Migration`] to carry old snapshots forward.
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

pub use checkpoint::{
    load_snapshot, CheckpointError, CheckpointHandle, CheckpointResult, CheckpointWriter,
    Checkpointer, FsCheckpointWriter,
};
pub use migration::{Migration, MigrationError, MigrationRegistry};
pub use snapshot::{Snapshot, SnapshotError};
pub use state::MaterializedState;
pub use wal::{Wal, WalEntry, WalError};
