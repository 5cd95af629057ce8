// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Types shared between the SQL layer and the storage layer of rivulet:
//! value formats, serde behavior flags, key serialization strategies, and
//! timestamp extraction policies.

pub mod clients;
pub mod sources;
