pub mod forward_pass;
pub mod rollup;
