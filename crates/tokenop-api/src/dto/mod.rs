//! Wire-facing request/response shapes. Domain types in `tokenop-types`
//! stay decoupled from the HTTP contract; these DTOs own the camelCase
//! field names and whatever validation the ingress boundary requires.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
