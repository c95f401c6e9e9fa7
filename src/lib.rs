// Module layout
// - bootstrap: configuration and shared context
// - domain: the link document and its rules
// - application: store port, use cases, DTOs
// - infrastructure: Firestore and in-memory store adapters
// - presentation: HTTP handlers, CORS and routing

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
