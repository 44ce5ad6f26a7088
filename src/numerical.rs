pub mod faces;
pub mod tridiagonal;
