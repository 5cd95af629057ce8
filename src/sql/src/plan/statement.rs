// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Statement planning entry points.

use rivulet_storage_types::clients::TopicClient;

use crate::ast::Statement;
use crate::catalog::SessionCatalog;
use crate::plan::{Plan, PlanError};
use crate::session::vars::SessionVars;

pub mod ddl;

/// Immutable state that applies to the planning of an entire statement.
///
/// The collaborators a statement needs — the catalog, the log-topic client,
/// and the session configuration — are injected here rather than owned by
/// any plan, so planning stays deterministic and substitutable in tests.
#[derive(Clone, Copy)]
pub struct StatementContext<'a> {
    /// The catalog of registered sources and logical topics.
    pub catalog: &'a dyn SessionCatalog,
    /// The client onto the backing log system.
    pub topic_client: &'a dyn TopicClient,
    /// The session's configuration variables.
    pub vars: &'a SessionVars,
}

/// Produces a [`Plan`] from a parsed statement.
///
/// `sql` is the original statement text; it is retained verbatim in the
/// plan for audit and replay.
pub fn plan(scx: &StatementContext, sql: &str, stmt: Statement) -> Result<Plan, PlanError> {
    match stmt {
        Statement::CreateSource(stmt) => ddl::plan_create_source(scx, sql, stmt),
    }
}
