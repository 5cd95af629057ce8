// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! SQL planning for rivulet.
//!
//! This crate turns parsed DDL statements, together with the session's
//! catalog, log-topic client, and configuration, into immutable plans that a
//! later apply stage executes. Parsing itself and plan application are out
//! of scope; the seams to both are the [`ast`] types on the way in and the
//! [`plan`] types on the way out.

/// Constructs an unstructured [`PlanError`](crate::plan::PlanError) from a
/// format string.
macro_rules! sql_err {
    ($($e:expr),* $(,)?) => {
        crate::plan::error::PlanError::Unstructured(format!($($e),*))
    }
}

/// Returns early with an unstructured
/// [`PlanError`](crate::plan::PlanError) built from a format string.
macro_rules! sql_bail {
    ($($e:expr),* $(,)?) => {
        return Err(sql_err!($($e),*))
    }
}

pub mod ast;
pub mod catalog;
pub mod normalize;
pub mod plan;
pub mod session;
