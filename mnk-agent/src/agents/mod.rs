pub mod linear_q;
pub mod random;
