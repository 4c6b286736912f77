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

//! Address layer.
//!
//! Owns the subject grammar and the pure expansion of an endpoint base name, a list of
//! dotted topology labels and an instance id into the complete set of subjects an
//! instance listens on:
//!
//! ```text
//! full   := base ( "." infix )?
//! infix  := "all" ( "." scope )? | "any" ( "." scope )? | "id" "." instanceId
//! scope  := segment ( "." segment )*
//! ```
//!
//! Nothing in this layer touches the bus; see [`crate::binding`] for how each
//! descriptor is turned into a subscription.

mod descriptor_set;
mod error;
mod expander;
mod name;

pub use descriptor_set::DescriptorSet;
pub use error::AddressError;
pub use expander::expand;
pub use name::{Delivery, Infix, SubjectDescriptor, SEPARATOR};
