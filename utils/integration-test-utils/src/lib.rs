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

mod failing_bus;
pub use failing_bus::FailingSubscribeBus;
mod memory_bus;
pub use memory_bus::{MemoryBus, SubscriptionSnapshot};
mod recording_handler;
pub use recording_handler::RecordingHandler;

use tracing_subscriber::EnvFilter;

/// Installs a test-friendly `tracing` subscriber once per test binary. Later calls are
/// no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
