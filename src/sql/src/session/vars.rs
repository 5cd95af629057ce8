// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Session variables: engine-wide defaults that statements may override per
//! property.

/// Whether single-field values are wrapped in an outer record by default.
pub const DEFAULT_WRAP_SINGLE_VALUES: bool = true;

/// The session's configuration variables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionVars {
    wrap_single_values: bool,
}

impl Default for SessionVars {
    fn default() -> SessionVars {
        SessionVars {
            wrap_single_values: DEFAULT_WRAP_SINGLE_VALUES,
        }
    }
}

impl SessionVars {
    /// Returns whether single-field values are serialized wrapped in an
    /// outer record when the statement does not say otherwise.
    pub fn wrap_single_values(&self) -> bool {
        self.wrap_single_values
    }

    /// Sets the default for single-field value wrapping.
    pub fn set_wrap_single_values(&mut self, value: bool) {
        self.wrap_single_values = value;
    }
}
