//! Request option schemas and their validation.
//!
//! Every list-style operation declares a [`Schema`] of the options it
//! recognises. Caller-supplied options are checked against that schema
//! before a request is built, so mistakes surface locally as a
//! [`ValidationError`](crate::ValidationError) instead of a remote 400.
//!
//! Schemas are closed: options the schema does not declare are rejected.

mod schema;
mod validator;

pub use schema::{Literal, OptionSchema, Predicate, Schema, ValueRule, ValueType};
pub use validator::{validate, ValidatedPayload};
