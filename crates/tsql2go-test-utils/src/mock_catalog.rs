// Copyright (c) 2025 tsql2go contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock proto catalog and procedure inventory for matcher/backend tests
//! (spec §4.6), an in-memory stand-in for the parsed catalogs an external
//! extractor would supply.

use tsql2go_ast::ProcedureSummary;
use tsql2go_catalog::{Message, Method, Service, StaticCatalog};

/// Builder around [`StaticCatalog`] with a couple of canned services
/// pre-wired, for matcher tests that need a plausible catalog without
/// each test hand-assembling one.
#[derive(Debug, Clone, Default)]
pub struct MockProtoCatalog {
    services: Vec<Service>,
    messages: Vec<Message>,
}

impl MockProtoCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// A `UserService` with `GetUser`/`CreateUser`/`DeleteUser` methods
    /// and matching request/response messages, covering the three
    /// operation classes the matcher's verb-prefix scoring cares about.
    pub fn user_service() -> Self {
        Self::new()
            .with_message(Message::new("GetUserRequest", "user.v1.GetUserRequest"))
            .with_message(Message::new("GetUserResponse", "user.v1.GetUserResponse"))
            .with_message(Message::new("CreateUserRequest", "user.v1.CreateUserRequest"))
            .with_message(Message::new("CreateUserResponse", "user.v1.CreateUserResponse"))
            .with_message(Message::new("DeleteUserRequest", "user.v1.DeleteUserRequest"))
            .with_message(Message::new("DeleteUserResponse", "user.v1.DeleteUserResponse"))
            .with_service(
                Service::new("UserService", "user.v1").with_methods(vec![
                    Method::new("GetUser", "GetUserRequest", "GetUserResponse"),
                    Method::new("CreateUser", "CreateUserRequest", "CreateUserResponse"),
                    Method::new("DeleteUser", "DeleteUserRequest", "DeleteUserResponse"),
                ]),
            )
    }

    pub fn build(self) -> StaticCatalog {
        StaticCatalog::new()
            .with_services(self.services)
            .with_messages(self.messages)
    }
}

/// A named collection of [`ProcedureSummary`] values, standing in for the
/// extractor output the matcher and RPC backend both consume.
#[derive(Debug, Clone, Default)]
pub struct MockProcedureInventory {
    procedures: Vec<ProcedureSummary>,
}

impl MockProcedureInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_procedure(mut self, summary: ProcedureSummary) -> Self {
        self.procedures.push(summary);
        self
    }

    pub fn procedures(&self) -> &[ProcedureSummary] {
        &self.procedures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_service_catalog_has_three_methods() {
        let catalog = MockProtoCatalog::user_service().build();
        let count = catalog.all_methods().count();
        assert_eq!(count, 3);
    }

    #[test]
    fn inventory_holds_procedures_in_order() {
        let inventory = MockProcedureInventory::new()
            .with_procedure(ProcedureSummary::new("GetUserById"))
            .with_procedure(ProcedureSummary::new("RemoveUser"));
        assert_eq!(inventory.procedures().len(), 2);
        assert_eq!(inventory.procedures()[0].name, "GetUserById");
    }
}
