/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
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

//! Structured observability contract.
//!
//! Library code emits `tracing` events carrying an `event` name from [`events`] and
//! field keys from [`fields`]. Installing a subscriber is left to binaries and tests.

pub mod events;
pub mod fields;
