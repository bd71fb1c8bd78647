//! Progress reporting for batch fetches

pub mod reporter;
