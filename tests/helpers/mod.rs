// Shared test helpers
//
// Included by each test target with `#[path = "../helpers/mod.rs"] mod helpers;`
// so not every target uses every item.
#![allow(dead_code)]

pub mod fake_gateway;

pub use fake_gateway::*;
pub use fake_merchant_warrior::*;
pub use test_data::*;
