pub mod bc1d;
