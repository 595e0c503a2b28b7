// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! PBS integration: the inventory data model and the CLI-backed fetcher.
//!
//! Each category is listed with the matching PBS client (qstat, pbsnodes,
//! pbs_rstat, qmgr) and its full status output is parsed into records.

pub mod parser;
pub mod pbs;
pub mod types;

pub use pbs::{FetchError, Fetcher, Session};
pub use types::{Attribute, Category, Record};
