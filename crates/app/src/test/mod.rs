//! Service test support: a throwaway database per test with RLS enforced.

pub mod context;
pub mod db;
pub mod helpers;

pub use context::TestContext;
