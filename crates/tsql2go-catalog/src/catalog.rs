// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Static proto catalog
//!
//! A plain in-memory holder for an already-parsed set of services and
//! messages (spec §3.5). No async fetch path: the proto parser that
//! produces this data is an external collaborator (spec §1), so the
//! catalog here is always "already populated", never "fetched".

use std::collections::HashMap;

use crate::message::Message;
use crate::service::Service;

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    services: Vec<Service>,
    messages: HashMap<String, Message>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(mut self, services: Vec<Service>) -> Self {
        self.services = services;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages.into_iter().map(|m| (m.name.clone(), m)).collect();
        self
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.get(name)
    }

    /// All methods across all services, flattened for the matcher.
    pub fn all_methods(&self) -> impl Iterator<Item = (&Service, &crate::method::Method)> {
        self.services
            .iter()
            .flat_map(|s| s.methods.iter().map(move |m| (s, m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    #[test]
    fn looks_up_message_by_name() {
        let catalog = StaticCatalog::new().with_messages(vec![Message::new(
            "GetUserRequest",
            "pkg.GetUserRequest",
        )]);
        assert!(catalog.message("GetUserRequest").is_some());
        assert!(catalog.message("Missing").is_none());
    }

    #[test]
    fn flattens_methods_across_services() {
        let catalog = StaticCatalog::new().with_services(vec![
            Service::new("Users", "pkg").with_methods(vec![Method::new(
                "GetUser",
                "GetUserRequest",
                "User",
            )]),
            Service::new("Orders", "pkg").with_methods(vec![Method::new(
                "CreateOrder",
                "CreateOrderRequest",
                "Order",
            )]),
        ]);
        assert_eq!(catalog.all_methods().count(), 2);
    }
}
