/********************************************************************************
 * Copyright (c) 2025 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input validation failures raised before any expansion work.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddressError {
    EmptyBase,
    InvalidBase(String),
    InvalidTopology(String),
    InvalidInstanceId(String),
}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressError::EmptyBase => write!(f, "base subject must not be empty"),
            AddressError::InvalidBase(base) => write!(
                f,
                "invalid base subject '{base}': segments must be non-empty and free of whitespace, '*' and '>'"
            ),
            AddressError::InvalidTopology(topology) => write!(
                f,
                "invalid topology '{topology}': segments must be non-empty and free of whitespace, '*' and '>'"
            ),
            AddressError::InvalidInstanceId(id) => write!(
                f,
                "invalid instance id '{id}': must be a single segment free of whitespace, '*' and '>'"
            ),
        }
    }
}

impl Error for AddressError {}
